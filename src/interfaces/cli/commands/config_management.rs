//! Config file generation and inspection

use std::path::Path;

use colored::Colorize;

use crate::config::{DEFAULT_CONFIG_PATH, StaticConfig};
use crate::interfaces::cli::CliError;

/// Write a sample configuration file
pub fn config_init(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if Path::new(&path).exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists, pass --force to overwrite",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    match StaticConfig::default().save_to_file(&path) {
        Ok(()) => {
            println!(
                "  {} {}",
                "Configuration file generated successfully".green(),
                path.blue()
            );
            println!(
                "  {}",
                "Edit the file to point at your shortlink server".yellow()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "  {} {}",
                "Failed to generate configuration file".red(),
                e.to_string().red()
            );
            Err(CliError::CommandError(format!(
                "Unable to write configuration file: {}",
                e
            )))
        }
    }
}

/// Print the effective configuration after file and env merging
pub fn config_show(config: &StaticConfig) -> Result<(), CliError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| CliError::CommandError(format!("Unable to render configuration: {}", e)))?;
    println!("{}", "Effective configuration:".bold().green());
    println!();
    print!("{}", rendered);
    Ok(())
}
