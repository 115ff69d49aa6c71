//! Service health check

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::report::session::Session;

pub async fn check_health(session: &Session) -> Result<(), CliError> {
    let reply = session
        .gateway()
        .health()
        .await?
        .into_result("health check")?;

    println!("{} Service status: {}", "✓".bold().green(), reply.status);
    Ok(())
}
