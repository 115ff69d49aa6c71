//! QR artifact commands

use colored::Colorize;

use crate::artifact::clipboard::system_clipboard;
use crate::artifact::{CopyOutcome, SaveOutcome};
use crate::cli::QrAction;
use crate::config::StaticConfig;
use crate::interfaces::cli::{CliError, resolve_out_dir};
use crate::report::session::Session;
use crate::utils::sanitize_code;

pub async fn run_qr_action(
    session: &Session,
    config: &StaticConfig,
    action: QrAction,
) -> Result<(), CliError> {
    match action {
        QrAction::Copy { code, size } => {
            point_session_at(session, code, size.unwrap_or(config.qr.size))?;
            copy_qr(session).await
        }
        QrAction::Save { code, size, out } => {
            point_session_at(session, code, size.unwrap_or(config.qr.size))?;
            let out_dir = resolve_out_dir(out, &config.export.dir);
            save_qr(session, &out_dir).await
        }
    }
}

/// With an explicit code, retarget the session's artifact slot; the
/// chain fetches on demand. Without one the slot keeps whatever the
/// last shorten stored.
fn point_session_at(
    session: &Session,
    code: Option<String>,
    size: u32,
) -> Result<(), CliError> {
    if let Some(raw) = code {
        let code = sanitize_code(&raw).ok_or_else(|| {
            CliError::ParseError("Please enter a valid short code".to_string())
        })?;
        session.set_artifact(&code, size);
    }
    Ok(())
}

async fn copy_qr(session: &Session) -> Result<(), CliError> {
    let mut surface = system_clipboard();
    match session.copy_qr(surface.as_mut()).await? {
        CopyOutcome::Image => {
            println!("{} QR Code copied to clipboard!", "✓".bold().green());
        }
        CopyOutcome::DataUrlText => {
            println!(
                "{} QR Code data copied! Paste in image editor.",
                "✓".bold().green()
            );
        }
        CopyOutcome::ManualPrompt(data_url) => {
            println!(
                "{} Image data shown. Copy it manually:",
                "⚠".bold().yellow()
            );
            println!("{}", data_url);
        }
    }
    Ok(())
}

async fn save_qr(session: &Session, out_dir: &std::path::Path) -> Result<(), CliError> {
    let path = match session.save_qr(out_dir).await? {
        SaveOutcome::ReencodedPng(path) => path,
        SaveOutcome::RawBytes(path) => path,
    };
    println!("{} QR Code downloaded!", "✓".bold().green());
    println!(
        "{} Saved to: {}",
        "ℹ".bold().blue(),
        path.display().to_string().cyan()
    );
    Ok(())
}
