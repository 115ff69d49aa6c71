//! Link management commands for logged-in users

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::ShortstatsError;
use crate::interfaces::cli::CliError;
use crate::report::session::Session;
use crate::utils::code::sanitize_code;
use crate::utils::time::format_date_label;

pub async fn list_urls(session: &Session, config: &StaticConfig) -> Result<(), CliError> {
    let token = stored_token(config)?;
    let reply = session
        .gateway()
        .my_urls(&token)
        .await?
        .into_result("list URLs")?;

    if reply.urls.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Your short links:".bold().green());
    println!();
    for entry in &reply.urls {
        println!(
            "  {} -> {} {}",
            entry.code.cyan(),
            entry.original_url.blue().underline(),
            format!("(created: {})", format_date_label(&entry.created_at)).dimmed()
        );
    }
    println!();
    println!("Total: {} links", reply.count);
    Ok(())
}

pub async fn delete_url(
    session: &Session,
    config: &StaticConfig,
    raw_code: &str,
) -> Result<(), CliError> {
    let token = stored_token(config)?;
    let code = sanitize_code(raw_code)
        .ok_or_else(|| CliError::ParseError("Please enter a valid short code".to_string()))?;

    let reply = session
        .gateway()
        .delete_url(&token, &code)
        .await?
        .into_result("delete short link")?;

    println!("{} {}", "✓".bold().green(), reply.message);
    Ok(())
}

fn stored_token(config: &StaticConfig) -> Result<String, CliError> {
    config.load_token()?.ok_or_else(|| {
        CliError::ApiError(ShortstatsError::auth(
            "Not logged in. Run `shortstats login` first.",
        ))
    })
}
