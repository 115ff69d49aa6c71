use clap::{CommandFactory, Parser};

use shortstats::cli::Cli;
use shortstats::config::StaticConfig;
use shortstats::interfaces::cli::run_cli_command;
use shortstats::system::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = StaticConfig::load();
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    // Keep the guard alive so buffered log lines flush on exit
    let _guard = init_logging(&config.logging);

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    if let Err(e) = run_cli_command(command, &config).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
