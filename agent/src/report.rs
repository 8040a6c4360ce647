//! CSV report rendering.
//!
//! One row per device in the fixed ten-column order of
//! [`HealthRecord::COLUMNS`]. Fields containing separators or quotes
//! are quoted RFC-4180 style so uptime values like `5 weeks, 4 days`
//! survive round-trips through spreadsheet tools.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use netvitals_core::health::HealthRecord;

/// Render records as CSV text, header first.
pub fn render_csv(records: &[HealthRecord]) -> String {
    let mut out = String::new();
    out.push_str(&HealthRecord::COLUMNS.join(","));
    out.push('\n');
    for record in records {
        let row: Vec<String> = record.values().iter().map(|v| escape_field(v)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Write the report to `path`, creating or truncating it.
pub fn write_report(path: &Path, records: &[HealthRecord]) -> std::io::Result<()> {
    std::fs::write(path, render_csv(records))
}

/// Default report path: `netvitals-report-<YYYYmmdd-HHMMSS>.csv` in the
/// working directory.
pub fn default_report_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "netvitals-report-{}.csv",
        now.format("%Y%m%d-%H%M%S")
    ))
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
