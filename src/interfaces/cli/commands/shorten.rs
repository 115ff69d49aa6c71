//! Shorten command

use chrono::{DateTime, Utc};
use colored::Colorize;
use url::Url;

use crate::api::payloads::ShortenRequest;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::report::session::Session;

/// Create a short link and track its QR artifact for copy/save
pub async fn shorten_url(
    session: &Session,
    config: &StaticConfig,
    url: String,
    custom_code: Option<String>,
    expires: Option<String>,
) -> Result<(), CliError> {
    if !is_http_url(&url) {
        return Err(CliError::ParseError(
            "Please enter a valid URL (include http:// or https://)".to_string(),
        ));
    }

    let expires_at = parse_expiry(expires)?;
    let custom_code = custom_code.filter(|c| !c.trim().is_empty());
    let token = config.load_token()?;

    let reply = session
        .gateway()
        .shorten(
            ShortenRequest {
                url,
                custom_code,
                expires_at,
            },
            token,
        )
        .await?
        .into_result("create short link")?;

    // QR bytes start loading now so copy/save is usually instant
    session.track_artifact(&reply.code, config.qr.size);

    println!("{} URL shortened successfully!", "✓".bold().green());
    println!();
    println!(
        "  {} {}",
        "Original URL:".cyan(),
        reply.original_url.blue().underline()
    );
    println!(
        "  {} {}",
        "Short URL:".cyan(),
        reply.short_url.blue().underline()
    );
    println!("  {} {}", "Code:".cyan(), reply.code.magenta());
    println!();
    println!(
        "{} QR code ready via: qr copy / qr save",
        "ℹ".bold().blue()
    );
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn parse_expiry(expires: Option<String>) -> Result<Option<DateTime<Utc>>, CliError> {
    let Some(raw) = expires else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| CliError::ParseError(format!("invalid expiration time {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_and_https_urls_pass_validation() {
        assert!(is_http_url("https://example.com/page"));
        assert!(is_http_url("http://localhost:8080"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn expiry_parses_rfc3339_into_utc() {
        let parsed = parse_expiry(Some("2026-12-31T12:00:00+02:00".to_string())).unwrap();
        assert_eq!(
            parsed.unwrap().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "2026-12-31T10:00:00Z"
        );
    }

    #[test]
    fn missing_expiry_is_none() {
        assert_eq!(parse_expiry(None).unwrap(), None);
    }

    #[test]
    fn malformed_expiry_is_a_parse_error() {
        assert!(matches!(
            parse_expiry(Some("tomorrow".to_string())),
            Err(CliError::ParseError(_))
        ));
    }
}
