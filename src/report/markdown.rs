//! Markdown rendering of lookup results

use chrono::{DateTime, Local};

use crate::parser::types::Ecosystem;
use crate::version::types::{LookupResult, VulnerabilityStatus};

const TABLE_HEADER: &str = "| Package | Current Version | Latest Version | Security Issues |\n\
                            |---------|----------------|----------------|-----------------|\n";

/// Marker for a dependency whose declared version equals the latest
pub const UP_TO_DATE: &str = "✅";
/// Marker for a dependency with a newer (or different) latest version
pub const UPDATE_AVAILABLE: &str = "⬆️";
/// Prefix for cells listing known vulnerabilities
pub const VULNERABLE: &str = "🛑";

/// Report title, generation time and introduction
pub fn header(generated_at: DateTime<Local>) -> String {
    format!(
        "# Dependency Analysis Report\n\n\
         Generated on: {}\n\n\
         This report shows the current and latest versions of dependencies across projects.\n\n\
         ---\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Section describing a failure that prevented an analysis
pub fn error_section(message: &str) -> String {
    format!("\n## Error\n\n{}\n\n---\n\n", message)
}

/// Legend and closing line
pub fn footer() -> String {
    format!(
        "\n## Report Summary\n\n\
         - {} = Up to date\n\
         - {} = Update available\n\
         - {} = Known vulnerabilities\n\n\
         ---\n\n\
         Report complete.\n",
        UP_TO_DATE, UPDATE_AVAILABLE, VULNERABLE
    )
}

/// Table cells may not contain raw pipes
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn security_cell(status: &VulnerabilityStatus) -> String {
    match status {
        VulnerabilityStatus::Checked(ids) if ids.is_empty() => "None".to_string(),
        VulnerabilityStatus::Checked(ids) => format!("{} {}", VULNERABLE, ids.join(", ")),
        other => other.labels().join(", "),
    }
}

fn row(result: &LookupResult) -> String {
    let latest = result.latest_version.to_string();
    let up_to_date =
        result.latest_version.as_resolved() == Some(result.declared_version.as_str());
    let marker = if up_to_date {
        UP_TO_DATE
    } else {
        UPDATE_AVAILABLE
    };

    format!(
        "| {} | {} | {} {} | {} |\n",
        escape_cell(&result.name),
        escape_cell(&result.declared_version),
        escape_cell(&latest),
        marker,
        escape_cell(&security_cell(&result.vulnerabilities))
    )
}

/// Section for one (ecosystem, directory) pair, rows sorted by package name
pub fn format_section(ecosystem: Ecosystem, directory: &str, results: &[LookupResult]) -> String {
    let title = format!(
        "## {} Dependencies in {}\n\n",
        ecosystem.display_name(),
        directory
    );

    if results.is_empty() {
        return format!("{}No dependencies found.\n\n", title);
    }

    let mut sorted: Vec<&LookupResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut section = title;
    section.push_str(TABLE_HEADER);
    for result in sorted {
        section.push_str(&row(result));
    }
    section.push('\n');
    section
}
