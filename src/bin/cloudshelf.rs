//! Cloudshelf CLI Binary
//!
//! Command-line interface for browsing and managing project folders.

use anyhow::Context;
use clap::Parser;
use cloudshelf::logging::init_logging;
use cloudshelf::tooling::cli::{Cli, CliContext};
use std::process;

async fn run(cli: Cli) -> anyhow::Result<String> {
    let context = CliContext::new(&cli).context("Error initializing cloudshelf")?;

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let output = context.execute(&cli.command).await?;
    Ok(output)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
