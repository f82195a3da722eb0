use std::io;
use std::process::ExitCode;

use clap::Parser;

use depgraph::app::{self, EXIT_CONFIG_ERROR};
use depgraph::config::{AppConfig, Cli};
use depgraph::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[CONFIG ERROR] {e}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    match app::run(&config, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            ExitCode::FAILURE
        }
    }
}
