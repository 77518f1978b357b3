// ABOUTME: Entry point wiring the command line to the conversion operations
// ABOUTME: The only place that prints user-facing errors and chooses exit codes

mod cli;
mod config;
mod convert;
mod model;
mod ssh;
mod yaml;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConvertCommand};
use config::Config;
use convert::Destination;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

const CONVERSION_FAILURE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Flag misuse is reported before any configuration is read
    let destination = match cli.destination() {
        Ok(destination) => destination,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(CONVERSION_FAILURE);
        }
    };

    init_logging(&config, cli.verbose);

    match run(cli, &config, destination) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("Conversion failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(CONVERSION_FAILURE)
        }
    }
}

fn init_logging(config: &Config, verbose: u8) {
    let base = config.log_level().unwrap_or(Level::WARN);
    let level = match verbose {
        0 => base,
        1 => base.max(Level::INFO),
        2 => base.max(Level::DEBUG),
        _ => Level::TRACE,
    };

    // Standard output may carry the converted document
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, config: &Config, destination: Destination) -> Result<ExitCode> {
    let Commands::Convert(command) = cli.command;

    match command {
        ConvertCommand::Yaml(args) => {
            let keys_dir = args
                .keys_directory
                .unwrap_or_else(|| PathBuf::from(&config.keys.directory));

            convert::yaml_to_ssh(&args.input, &keys_dir, config.keys.digest_length, &destination)?;
        }
        ConvertCommand::Ssh(args) => {
            let summary = convert::ssh_to_yaml(&args.input, args.keys_directory.as_deref(), &destination)?;
            if let Destination::File(path) = &destination {
                tracing::info!(
                    "Wrote {} host(s) to {} ({} warning(s))",
                    summary.hosts,
                    path.display(),
                    summary.warnings.len()
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
