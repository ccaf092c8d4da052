//! eaglebridge CLI Binary
//!
//! Command-line interface for scanning Eagle libraries and exporting their media.

use clap::Parser;
use eaglebridge::logging::init_logging;
use eaglebridge::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Create CLI context
    let context = match CliContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = context
        .config()
        .logging
        .clone()
        .with_overrides(&cli.logging_overrides());
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
