//! Report exporters
//!
//! Two artifact formats: a sectioned CSV meant for spreadsheets and a
//! pretty-printed JSON dump of the canonical report. The CSV is built
//! table by table through the `csv` writer so fields with commas or
//! quotes stay RFC 4180 clean, with section titles and separator
//! blank lines spliced in between tables.

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::errors::{Result, ShortstatsError};
use crate::report::StatsReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// File name an export lands under: `stats-<code>.<ext>`
pub fn export_file_name(code: &str, format: ExportFormat) -> String {
    format!("stats-{}.{}", code, format.extension())
}

/// Render the report as sectioned CSV.
///
/// The summary block is always present; breakdown sections appear only
/// when they carry at least one row. Day rows keep their raw ISO dates
/// in ascending order, referrers keep server ranking, user agents and
/// countries sort by count descending without truncation.
pub fn report_to_csv(report: &StatsReport) -> Result<String> {
    let mut out = csv_table(
        ("Metric", "Value"),
        &[
            ("Code".to_string(), report.code.clone()),
            ("Original URL".to_string(), report.original_url.clone()),
            (
                "Created At".to_string(),
                report.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("Total Clicks".to_string(), report.total_clicks.to_string()),
            ("Unique IPs".to_string(), report.unique_visitors.to_string()),
        ],
    )?;

    if let Some(days) = &report.clicks_by_day {
        if !days.is_empty() {
            let rows: Vec<(String, String)> = days
                .iter()
                .map(|(date, count)| (date.clone(), count.to_string()))
                .collect();
            push_section(&mut out, "Clicks by Day", ("Date", "Clicks"), &rows)?;
        }
    }

    if let Some(referrers) = &report.top_referrers {
        if !referrers.is_empty() {
            let rows: Vec<(String, String)> = referrers
                .iter()
                .map(|stat| (stat.label().to_string(), stat.count.to_string()))
                .collect();
            push_section(&mut out, "Top Referrers", ("Referrer", "Count"), &rows)?;
        }
    }

    if let Some(agents) = &report.user_agents {
        if !agents.is_empty() {
            let rows = descending_rows(agents);
            push_section(&mut out, "User Agents", ("User Agent", "Count"), &rows)?;
        }
    }

    if let Some(countries) = &report.countries {
        if !countries.is_empty() {
            let rows = descending_rows(countries);
            push_section(&mut out, "Countries", ("Country", "Count"), &rows)?;
        }
    }

    Ok(out)
}

/// Render the report as pretty-printed JSON
pub fn report_to_json(report: &StatsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the report to `dir` in the requested format, creating the
/// directory when it does not exist yet
pub fn write_export(report: &StatsReport, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let contents = match format {
        ExportFormat::Csv => report_to_csv(report)?,
        ExportFormat::Json => report_to_json(report)?,
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(export_file_name(&report.code, format));
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Map entries as rows sorted by count descending, label ascending on
/// ties
fn descending_rows(entries: &std::collections::BTreeMap<String, u64>) -> Vec<(String, String)> {
    let mut rows: Vec<(&String, &u64)> = entries.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1));
    rows.into_iter()
        .map(|(label, count)| (label.clone(), count.to_string()))
        .collect()
}

fn push_section(
    out: &mut String,
    title: &str,
    header: (&str, &str),
    rows: &[(String, String)],
) -> Result<()> {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&csv_table(header, rows)?);
    Ok(())
}

fn csv_table(header: (&str, &str), rows: &[(String, String)]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record([header.0, header.1])?;
    for (key, value) in rows {
        writer.write_record([key.as_str(), value.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ShortstatsError::serialization(format!("csv flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ShortstatsError::serialization(format!("csv output not utf-8: {}", e)))
}
