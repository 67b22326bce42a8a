//! CLI output formatting

use crate::build::BuildOutcome;
use crate::core::StepLink;
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");

/// Format a list of links for display
pub fn format_links(links: &[StepLink]) -> String {
    if links.is_empty() {
        return style("(none)").dim().to_string();
    }
    links
        .iter()
        .map(|l| style(l.to_string()).cyan().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a recorded build for display
pub fn format_build_record(name: &str, outcome: BuildOutcome, duration: Duration) -> String {
    let (icon, outcome) = match outcome {
        BuildOutcome::Succeeded => (CHECK, style("SUCCEEDED").green()),
        BuildOutcome::Failed => (CROSS, style("FAILED").red()),
    };
    format!(
        "{}{} {} {}",
        icon,
        style(name).bold(),
        outcome,
        style(format!("({}ms)", duration.as_millis())).dim()
    )
}
