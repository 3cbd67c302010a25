use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stylewise::cli::commands::analyze::AnalyzeOptions;
use stylewise::types::{DraftProfile, Gender, SkinTone};

/// Parse gender from string
fn parse_gender(s: &str) -> Result<Gender, String> {
    s.parse()
}

/// Parse skin tone from string
fn parse_skin_tone(s: &str) -> Result<SkinTone, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "stylewise")]
#[command(
    version,
    about = "Body-shape analysis and outfit recommendations from your measurements"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

/// Profile fields. All optional so incomplete profiles get a friendly message.
#[derive(Args)]
struct ProfileArgs {
    #[arg(long, help = "Your name")]
    name: Option<String>,
    #[arg(long, value_parser = parse_gender, help = "Gender: male, female, other")]
    gender: Option<Gender>,
    #[arg(long, help = "Height in cm")]
    height: Option<f64>,
    #[arg(long, help = "Weight in kg")]
    weight: Option<f64>,
    #[arg(long, help = "Chest in cm")]
    chest: Option<f64>,
    #[arg(long, help = "Waist in cm")]
    waist: Option<f64>,
    #[arg(long, help = "Hips in cm")]
    hip: Option<f64>,
    #[arg(long, value_parser = parse_skin_tone, help = "Skin tone: warm, cool, neutral")]
    skin_tone: Option<SkinTone>,
}

impl From<ProfileArgs> for DraftProfile {
    fn from(args: ProfileArgs) -> Self {
        DraftProfile {
            name: args.name,
            gender: args.gender,
            height: args.height,
            weight: args.weight,
            chest: args.chest,
            waist: args.waist,
            hip: args.hip,
            skin_tone: args.skin_tone,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get a body-shape analysis with styling advice and three product picks
    Analyze {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long, help = "LLM provider (gemini, openai)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
        #[arg(long = "dry-run", help = "Print the prompt and output schema, don't call the model")]
        dry_run: bool,
        #[arg(long, help = "Show consultation statistics")]
        stats: bool,
    },

    /// Show the rule-based body-shape pre-check only
    Classify {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mStylewise encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            profile,
            provider,
            model,
            format,
            dry_run,
            stats,
        } => {
            stylewise::cli::commands::analyze::run(AnalyzeOptions {
                profile: profile.into(),
                provider,
                model,
                format,
                dry_run,
                stats,
            })?;
        }
        Commands::Classify { profile, format } => {
            stylewise::cli::commands::classify::run(profile.into(), &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                stylewise::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                stylewise::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                stylewise::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
