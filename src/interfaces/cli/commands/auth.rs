//! Authentication commands

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::api::payloads::{LoginRequest, RegisterRequest};
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::report::session::Session;

pub async fn login(
    session: &Session,
    config: &StaticConfig,
    username: Option<String>,
) -> Result<(), CliError> {
    let username = required_field(username, "Username")?;
    let password = prompt_password("Password")?;

    let reply = session
        .gateway()
        .login(LoginRequest { username, password })
        .await?
        .into_result("login")?;

    config.save_token(&reply.token)?;
    println!(
        "{} Logged in as {}",
        "✓".bold().green(),
        reply.user.username.cyan()
    );
    Ok(())
}

pub async fn register(
    session: &Session,
    config: &StaticConfig,
    username: Option<String>,
    email: Option<String>,
) -> Result<(), CliError> {
    let username = required_field(username, "Username")?;
    let email = required_field(email, "Email")?;
    let password = prompt_password_with_confirm()?;

    let reply = session
        .gateway()
        .register(RegisterRequest {
            username,
            email,
            password,
        })
        .await?
        .into_result("register")?;

    config.save_token(&reply.token)?;
    println!(
        "{} Account created, logged in as {}",
        "✓".bold().green(),
        reply.user.username.cyan()
    );
    Ok(())
}

pub fn logout(config: &StaticConfig) -> Result<(), CliError> {
    if config.remove_token()? {
        println!("{} Logged out", "✓".bold().green());
    } else {
        println!("{} No stored session", "ℹ".bold().blue());
    }
    Ok(())
}

/// Use the flag value when given, otherwise prompt for it
fn required_field(value: Option<String>, label: &str) -> Result<String, CliError> {
    if let Some(value) = value {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(CliError::ParseError(format!("{} must not be empty", label)));
        }
        return Ok(value);
    }

    print!("{}: ", label);
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::CommandError(format!("Failed to read {}: {}", label, e)))?;
    let value = line.trim().to_string();
    if value.is_empty() {
        return Err(CliError::ParseError(format!("{} must not be empty", label)));
    }
    Ok(value)
}

fn prompt_password(label: &str) -> Result<String, CliError> {
    print!("{}: ", label);
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    rpassword::read_password()
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
}

fn prompt_password_with_confirm() -> Result<String, CliError> {
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;
    if password != confirm {
        return Err(CliError::ParseError("Passwords do not match".to_string()));
    }
    Ok(password)
}
