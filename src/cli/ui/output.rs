use console::style;

use crate::types::{AnalysisOutcome, AnalysisResult, DegradeReason};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Render a consultation, flagging offline results
    pub fn outcome(&self, name: &str, outcome: &AnalysisOutcome) {
        if let Some(reason) = outcome.reason() {
            self.warning(&offline_notice(reason));
        }
        self.result(name, outcome.result());
    }

    pub fn result(&self, name: &str, result: &AnalysisResult) {
        self.header(&format!("Style consultation for {}", name));

        println!(
            "\n{} {}",
            style("Body shape:").bold(),
            style(&result.body_shape).cyan()
        );

        self.section("Advice");
        println!("{}", result.advice);

        self.section("Recommendations");
        for (i, item) in result.recommendations.iter().enumerate() {
            println!(
                "{}. {} {}",
                i + 1,
                style(&item.name).bold(),
                style(format!("[{}]", item.category)).dim()
            );
            println!("   {}", item.description);
            println!("   {} {}", style("Buy:").dim(), item.buy_url);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Notice shown above an offline result
pub fn offline_notice(reason: DegradeReason) -> String {
    match reason {
        DegradeReason::Configuration => {
            "AI stylist offline: no API key configured. Showing general advice.".to_string()
        }
        DegradeReason::Upstream => {
            "AI stylist offline: the model could not be reached. Showing general advice."
                .to_string()
        }
    }
}
