//! CLI interface module
//!
//! Wires clap-parsed commands to the session machinery. Every command
//! funnels through [`run_cli_command`]; failures come back as
//! [`CliError`] so `main` can format them uniformly and pick the exit
//! code.

pub mod commands;
pub mod console;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::ShortstatsError;
use crate::report::session::Session;

#[derive(Debug)]
pub enum CliError {
    /// Failure from the service, transport, or session machinery
    ApiError(ShortstatsError),
    /// Bad user input that never reached the service
    ParseError(String),
    /// Local command failure (filesystem, prompts)
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ApiError(err) => err.format_simple(),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ApiError(err) => err.format_colored(),
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortstatsError> for CliError {
    fn from(err: ShortstatsError) -> Self {
        CliError::ApiError(err)
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(command: Commands, config: &StaticConfig) -> Result<(), CliError> {
    // Config and logout work without a server connection
    if let Commands::Config { action } = command {
        return match action {
            ConfigCommands::Init { output_path, force } => {
                commands::config_init(output_path, force)
            }
            ConfigCommands::Show => commands::config_show(config),
        };
    }

    if let Commands::Logout = command {
        return commands::logout(config);
    }

    let gateway = ApiClient::new(&config.server)?;
    let session = Session::new(Arc::new(gateway));

    match command {
        Commands::Stats { code, export, out } => {
            commands::show_stats(
                &session,
                &code,
                export.map(Into::into),
                &resolve_out_dir(out, &config.export.dir),
            )
            .await
        }

        Commands::Export { format, out } => commands::export_retained(
            &session,
            format.into(),
            &resolve_out_dir(out, &config.export.dir),
        ),

        Commands::Shorten { url, code, expires } => {
            commands::shorten_url(&session, config, url, code, expires).await
        }

        Commands::Qr { action } => commands::run_qr_action(&session, config, action).await,

        Commands::Login { username } => commands::login(&session, config, username).await,

        Commands::Register { username, email } => {
            commands::register(&session, config, username, email).await
        }

        Commands::List => commands::list_urls(&session, config).await,

        Commands::Delete { code } => commands::delete_url(&session, config, &code).await,

        Commands::Health => commands::check_health(&session).await,

        Commands::Console => console::run_console(&session, config).await,

        Commands::Logout => unreachable!("handled above"),

        Commands::Config { .. } => unreachable!("handled above"),
    }
}

/// Pick the output directory for exports and saved artifacts
pub(crate) fn resolve_out_dir(out: Option<String>, configured: &str) -> PathBuf {
    out.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(configured))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_flag_overrides_configured_dir() {
        assert_eq!(
            resolve_out_dir(Some("/tmp/exports".to_string()), "."),
            PathBuf::from("/tmp/exports")
        );
        assert_eq!(resolve_out_dir(None, "exports"), PathBuf::from("exports"));
    }

    #[test]
    fn cli_error_formats_carry_the_message() {
        let err = CliError::from(ShortstatsError::export_no_data("No stats data to export"));
        assert_eq!(
            err.format_simple(),
            "Export Without Data: No stats data to export"
        );
        let parse = CliError::ParseError("bad expiry".to_string());
        assert_eq!(parse.format_simple(), "Parse error: bad expiry");
    }
}
