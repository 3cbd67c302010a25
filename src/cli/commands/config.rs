//! Config Command
//!
//! Manage Stylewise configuration.
//!
//! Usage:
//!   stylewise config show [-f json]
//!   stylewise config path
//!   stylewise config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{Result, StyleError};

/// Show merged effective configuration
pub fn show(format: &str) -> Result<()> {
    match format {
        "json" => ConfigLoader::show_config(true),
        "text" | "toml" => ConfigLoader::show_config(false),
        other => Err(StyleError::Config(format!(
            "Invalid format '{}'. Valid values: text, json",
            other
        ))),
    }
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
