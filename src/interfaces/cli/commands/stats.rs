//! Stats lookup command

use std::path::Path;

use colored::Colorize;

use crate::export::ExportFormat;
use crate::interfaces::cli::CliError;
use crate::render::{self, printer};
use crate::report::session::Session;

/// Look up a code, render the report, optionally export it
pub async fn show_stats(
    session: &Session,
    raw_code: &str,
    export: Option<ExportFormat>,
    out_dir: &Path,
) -> Result<(), CliError> {
    let report = session.lookup_stats(raw_code).await?;
    let rendered = render::render(&report)?;
    printer::print_report(&rendered);

    if let Some(format) = export {
        let path = session.export_report(format, out_dir)?;
        println!(
            "{} Stats exported as {}!",
            "✓".bold().green(),
            format.extension().to_uppercase()
        );
        println!(
            "{} Saved to: {}",
            "ℹ".bold().blue(),
            path.display().to_string().cyan()
        );
    }
    Ok(())
}
