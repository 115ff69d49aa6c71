//! Terminal presentation of a rendered report

use colored::Colorize;

use super::{
    BarRow, GeoRow, RenderedReport, Section, GEO_LOCAL_NOTE, GEO_PLACEHOLDER, TITLE_GEOGRAPHY,
    TITLE_REFERRERS, TITLE_TIME_SERIES, TITLE_USER_AGENTS,
};

/// Widest bar, in terminal cells
const BAR_WIDTH: usize = 24;

/// Labels pad to the longest in the section, capped here
const LABEL_CAP: usize = 40;

pub fn print_report(rendered: &RenderedReport) {
    println!("{}", rendered.heading.bold().green());
    println!();
    summary_row("Original URL:", rendered.summary.original_url.blue().underline());
    summary_row("Total Clicks:", &rendered.summary.total_clicks);
    summary_row("Unique Visitors:", &rendered.summary.unique_visitors);
    summary_row("Created:", &rendered.summary.created_label);

    if let Section::Rendered(rows) = &rendered.time_series {
        println!();
        println!("{}", TITLE_TIME_SERIES.bold());
        print_bar_rows(rows);
    }

    if let Section::Rendered(rows) = &rendered.referrers {
        println!();
        println!("{}", TITLE_REFERRERS.bold());
        let width = label_width(rows.iter().map(|r| r.label.as_str()));
        for row in rows {
            println!(
                "  {} {}",
                pad(&row.label, width).cyan(),
                row.count.to_string().green()
            );
        }
    }

    if let Section::Rendered(rows) = &rendered.user_agents {
        println!();
        println!("{}", TITLE_USER_AGENTS.bold());
        print_bar_rows(rows);
    }

    match &rendered.geography {
        Section::Rendered(geo) => {
            println!();
            println!("{}", TITLE_GEOGRAPHY.bold());
            if geo.local_note {
                println!("  {}", GEO_LOCAL_NOTE.dimmed());
            }
            let labels: Vec<String> = geo.rows.iter().map(geo_label).collect();
            let width = label_width(labels.iter().map(String::as_str));
            for (row, label) in geo.rows.iter().zip(&labels) {
                println!(
                    "  {} {} {}",
                    pad(label, width).cyan(),
                    bar(row.percentage),
                    row.count.to_string().dimmed()
                );
            }
        }
        Section::Placeholder => {
            println!();
            println!("{}", TITLE_GEOGRAPHY.bold());
            println!("  {}", GEO_PLACEHOLDER.dimmed().italic());
        }
        Section::Suppressed => {}
    }
    println!();
}

fn summary_row(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", pad(label, 16).cyan(), value);
}

fn print_bar_rows(rows: &[BarRow]) {
    let width = label_width(rows.iter().map(|r| r.label.as_str()));
    for row in rows {
        println!(
            "  {} {} {}",
            pad(&row.label, width).cyan(),
            bar(row.percentage),
            row.count.to_string().dimmed()
        );
    }
}

/// Country label with its share of all clicks
fn geo_label(row: &GeoRow) -> String {
    format!("{} ({:.1}%)", row.label, row.share_pct)
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_CAP)
}

fn pad(label: &str, width: usize) -> String {
    format!("{:<width$}", label)
}

fn bar(percentage: f64) -> String {
    let cells = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}
