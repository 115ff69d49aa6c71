//! Interactive console
//!
//! One session lives for the whole loop, so a `stats` lookup leaves a
//! report behind for `export`, and a `shorten` leaves a QR reference
//! behind for `qr copy` / `qr save`. Command failures are printed and
//! the loop keeps going; only input failures end it.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cli::QrAction;
use crate::config::StaticConfig;
use crate::export::ExportFormat;
use crate::interfaces::cli::{CliError, commands, resolve_out_dir};
use crate::report::session::Session;

pub async fn run_console(session: &Session, config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "shortstats console".bold().green());
    println!("Server: {}", config.server.base_url.blue().underline());
    println!("{}", "Type `help` for commands, `quit` to leave".dimmed());
    println!();

    loop {
        print!("shortstats> ");
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;

        let Some(line) = read_line().await? else {
            // EOF, e.g. Ctrl-D or a closed pipe
            println!();
            break;
        };
        let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some(first) = words.first() else {
            continue;
        };

        match first.as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            _ => {
                if let Err(e) = dispatch(session, config, first, &words[1..]).await {
                    eprintln!("{}", e.format_colored());
                }
            }
        }
    }

    Ok(())
}

/// Read one stdin line off the async runtime
async fn read_line() -> Result<Option<String>, CliError> {
    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .map_err(|e| CliError::CommandError(format!("Input task failed: {}", e)))?;

    match read {
        Ok((0, _)) => Ok(None),
        Ok((_, line)) => Ok(Some(line)),
        Err(e) => Err(CliError::CommandError(format!(
            "Failed to read input: {}",
            e
        ))),
    }
}

async fn dispatch(
    session: &Session,
    config: &StaticConfig,
    command: &str,
    args: &[String],
) -> Result<(), CliError> {
    let out_dir = resolve_out_dir(None, &config.export.dir);

    match command {
        "stats" => {
            let code = args
                .first()
                .ok_or_else(|| CliError::ParseError("Usage: stats <code> [csv|json]".to_string()))?;
            let export = args.get(1).map(|w| parse_format(w)).transpose()?;
            commands::show_stats(session, code, export, &out_dir).await
        }
        "export" => {
            let format = args
                .first()
                .ok_or_else(|| CliError::ParseError("Usage: export <csv|json>".to_string()))?;
            commands::export_retained(session, parse_format(format)?, &out_dir)
        }
        "shorten" => {
            let url = args
                .first()
                .cloned()
                .ok_or_else(|| CliError::ParseError("Usage: shorten <url> [code]".to_string()))?;
            commands::shorten_url(session, config, url, args.get(1).cloned(), None).await
        }
        "qr" => {
            let action = match args.first().map(String::as_str) {
                Some("copy") => QrAction::Copy {
                    code: args.get(1).cloned(),
                    size: None,
                },
                Some("save") => QrAction::Save {
                    code: args.get(1).cloned(),
                    size: None,
                    out: None,
                },
                _ => {
                    return Err(CliError::ParseError(
                        "Usage: qr <copy|save> [code]".to_string(),
                    ));
                }
            };
            commands::run_qr_action(session, config, action).await
        }
        "list" => commands::list_urls(session, config).await,
        "delete" => {
            let code = args
                .first()
                .ok_or_else(|| CliError::ParseError("Usage: delete <code>".to_string()))?;
            commands::delete_url(session, config, code).await
        }
        "login" => commands::login(session, config, args.first().cloned()).await,
        "register" => {
            commands::register(session, config, args.first().cloned(), args.get(1).cloned()).await
        }
        "logout" => commands::logout(config),
        "health" => commands::check_health(session).await,
        other => Err(CliError::ParseError(format!("Unknown command: {}", other))),
    }
}

fn parse_format(word: &str) -> Result<ExportFormat, CliError> {
    match word {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        other => Err(CliError::ParseError(format!(
            "Export format must be csv or json, got: {}",
            other
        ))),
    }
}

const HELP_ROWS: [(&str, &str); 11] = [
    ("stats <code> [csv|json]", "show stats, optionally export"),
    ("export <csv|json>", "export the last shown stats"),
    ("shorten <url> [code]", "create a short link"),
    ("qr copy|save [code]", "copy or save the QR image"),
    ("list", "list your short links"),
    ("delete <code>", "delete one of your links"),
    ("login [user]", "log in and store the token"),
    ("register [user] [email]", "create an account and log in"),
    ("logout", "drop the stored session"),
    ("health", "check the service"),
    ("quit / exit", "leave the console"),
];

/// Usage strings padded to one shared comment column
fn help_entries() -> Vec<(String, &'static str)> {
    let width = HELP_ROWS.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    HELP_ROWS
        .iter()
        .map(|(usage, note)| (format!("{:<width$}", usage), *note))
        .collect()
}

fn print_help() {
    println!("{}", "Commands:".bold());
    for (usage, note) in help_entries() {
        println!("  {}  {}", usage.cyan(), format!("# {}", note).dimmed());
    }
}
