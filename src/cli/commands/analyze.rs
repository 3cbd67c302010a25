//! Analyze Command
//!
//! Run a style consultation for one profile.
//!
//! Usage:
//!   stylewise analyze --name Ada --gender female --height 168 --weight 58 \
//!       --chest 88 --waist 70 --hip 96 --skin-tone cool [--format json] [--dry-run]

use console::style;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::runtime::Runtime;

use super::OutputFormat;
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::style::{AnalysisMetrics, StylePipeline, build_request};
use crate::types::{AnalysisOutcome, DraftProfile, Result, UserMeasurements};

pub struct AnalyzeOptions {
    pub profile: DraftProfile,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub format: String,
    pub dry_run: bool,
    pub stats: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let format: OutputFormat = options.format.parse()?;
    let measurements = options.profile.complete()?;

    if options.dry_run {
        return print_request(&measurements, format);
    }

    let config = load_config(options.provider, options.model)?;

    let metrics = Arc::new(AnalysisMetrics::new());
    let mut pipeline = StylePipeline::from_config(&config)?;
    if options.stats {
        pipeline = pipeline.with_observer(metrics.clone());
    }

    let rt = Runtime::new()?;
    let outcome = rt.block_on(pipeline.analyze(&measurements));

    print_outcome(&measurements, &outcome, format)?;

    if options.stats {
        print_stats(&pipeline, &metrics, format)?;
    }

    Ok(())
}

/// Effective configuration with command-line overrides applied
fn load_config(provider: Option<String>, model: Option<String>) -> Result<Config> {
    let config = apply_overrides(ConfigLoader::load()?, provider, model);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(mut config: Config, provider: Option<String>, model: Option<String>) -> Config {
    if let Some(provider) = provider {
        if provider != config.llm.provider {
            // Model, endpoint and key settings belong to the configured provider
            config.llm.model = None;
            config.llm.api_base = None;
            config.llm.api_key = None;
            config.llm.api_key_env = None;
        }
        config.llm.provider = provider;
    }
    if let Some(model) = model {
        config.llm.model = Some(model);
    }
    config
}

fn print_stats(
    pipeline: &StylePipeline,
    metrics: &AnalysisMetrics,
    format: OutputFormat,
) -> Result<()> {
    let report = format!(
        "Provider: {} ({})\n{}",
        pipeline.provider_name(),
        pipeline.model(),
        metrics.summary().display()
    );
    write_stats(&report, format, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// Machine-readable formats own stdout, so statistics go to stderr there
fn write_stats(
    report: &str,
    format: OutputFormat,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<()> {
    let out: &mut dyn Write = match format {
        OutputFormat::Text => stdout,
        OutputFormat::Json | OutputFormat::Yaml => stderr,
    };
    writeln!(out, "\n{}", style("Statistics").bold())?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "{}", report)?;
    Ok(())
}

fn print_outcome(
    measurements: &UserMeasurements,
    outcome: &AnalysisOutcome,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => Output::new().outcome(&measurements.name, outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(outcome)?),
    }
    Ok(())
}

fn print_request(measurements: &UserMeasurements, format: OutputFormat) -> Result<()> {
    let request = build_request(measurements);

    match format {
        OutputFormat::Text => {
            let output = Output::new();
            output.section("Prompt");
            println!("{}", request.prompt.trim_end());
            output.section("Output schema");
            println!("{}", serde_json::to_string_pretty(&request.output_schema)?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&request)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&request)?),
    }
    Ok(())
}
