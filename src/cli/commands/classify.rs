//! Classify Command
//!
//! Print the rule-based body-shape label without calling a model.

use serde_json::json;

use super::OutputFormat;
use crate::style::classify;
use crate::types::{DraftProfile, Result};

pub fn run(profile: DraftProfile, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let measurements = profile.complete()?;
    let shape = classify(&measurements);

    let report = json!({"name": measurements.name, "ruleShape": shape.label()});

    match format {
        OutputFormat::Text => println!("{}", shape),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }
    Ok(())
}
