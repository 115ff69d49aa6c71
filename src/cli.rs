//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for shortstats using clap's
//! derive macros.

use clap::{Parser, Subcommand, ValueEnum};

use crate::export::ExportFormat;

/// Shortstats - Terminal analytics client for a URL shortener service
#[derive(Parser)]
#[command(name = "shortstats")]
#[command(version)]
#[command(about = "Terminal analytics client for a URL shortener service", long_about = None)]
pub struct Cli {
    /// Override the configured server base URL
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics for a short code
    ///
    /// Accepts either a bare code or a full short URL; the code is
    /// extracted from the URL's last path segment.
    Stats {
        /// Short code or full short URL
        code: String,

        /// Also export the report after showing it
        #[arg(long, value_enum)]
        export: Option<ExportFormatArg>,

        /// Directory exports are written to (default from config)
        #[arg(long)]
        out: Option<String>,
    },

    /// Export the report retained from this session's last lookup
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormatArg,

        /// Directory the export is written to (default from config)
        #[arg(long)]
        out: Option<String>,
    },

    /// Create a short link
    Shorten {
        /// Target URL
        url: String,

        /// Custom short code
        #[arg(long)]
        code: Option<String>,

        /// Expiration time (RFC3339, e.g. 2026-12-31T00:00:00Z)
        #[arg(long)]
        expires: Option<String>,
    },

    /// Copy or save the QR code image for a short link
    Qr {
        #[command(subcommand)]
        action: QrAction,
    },

    /// Log in and store the auth token
    Login {
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
    },

    /// Create an account and store the auth token
    Register {
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove the stored auth token
    Logout,

    /// List your short links
    List,

    /// Delete one of your short links
    Delete {
        /// Short code to delete
        code: String,
    },

    /// Check service health
    Health,

    /// Interactive console
    Console,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// QR artifact commands
#[derive(Subcommand)]
pub enum QrAction {
    /// Copy the QR image to the clipboard
    Copy {
        /// Short code or full short URL (defaults to the code
        /// shortened earlier in this session)
        code: Option<String>,

        /// Image size in pixels (default from config)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Save the QR image as qrcode-<code>.png
    Save {
        /// Short code or full short URL (defaults to the code
        /// shortened earlier in this session)
        code: Option<String>,

        /// Image size in pixels (default from config)
        #[arg(long)]
        size: Option<u32>,

        /// Directory to save into (default from config)
        #[arg(long)]
        out: Option<String>,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate an example configuration file
    Init {
        /// Output path (default: shortstats.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Export format as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_parses_code_and_export_flag() {
        let cli = Cli::try_parse_from(["shortstats", "stats", "abc123", "--export", "csv"])
            .unwrap();
        match cli.command {
            Some(Commands::Stats { code, export, out }) => {
                assert_eq!(code, "abc123");
                assert_eq!(export, Some(ExportFormatArg::Csv));
                assert!(out.is_none());
            }
            _ => panic!("expected stats command"),
        }
    }

    #[test]
    fn qr_save_accepts_optional_code_and_out_dir() {
        let cli = Cli::try_parse_from(["shortstats", "qr", "save", "--out", "/tmp"]).unwrap();
        match cli.command {
            Some(Commands::Qr {
                action: QrAction::Save { code, size, out },
            }) => {
                assert!(code.is_none());
                assert!(size.is_none());
                assert_eq!(out.as_deref(), Some("/tmp"));
            }
            _ => panic!("expected qr save command"),
        }
    }

    #[test]
    fn global_server_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["shortstats", "health", "--server", "http://sho.rt"])
            .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://sho.rt"));
        assert!(matches!(cli.command, Some(Commands::Health)));
    }

    #[test]
    fn export_requires_a_format() {
        assert!(Cli::try_parse_from(["shortstats", "export"]).is_err());
        assert!(Cli::try_parse_from(["shortstats", "export", "xml"]).is_err());
        assert!(Cli::try_parse_from(["shortstats", "export", "json"]).is_ok());
    }
}
