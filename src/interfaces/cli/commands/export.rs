//! Export command

use std::path::Path;

use colored::Colorize;

use crate::export::ExportFormat;
use crate::interfaces::cli::CliError;
use crate::report::session::Session;

/// Export the report retained from the session's last lookup.
///
/// Without a retained report this surfaces the no-data error; in a
/// fresh one-shot process that is always the case, which is the
/// intended nudge toward `stats <code> --export`.
pub fn export_retained(
    session: &Session,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<(), CliError> {
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
    Ok(())
}
