// ABOUTME: Command line definition for the convert subcommands
// ABOUTME: Validates the output flags and maps misuse to dedicated exit codes

use crate::convert::Destination;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(
    name = "shoji",
    version,
    about = "Shoji, parse SSH config file, read SSH keys and convert everything into a single YAML file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file [default: <config dir>/shoji/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert files.
    #[command(subcommand)]
    Convert(ConvertCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConvertCommand {
    /// Convert back a yaml file into ssh config and a folder containing all private keys.
    Yaml(YamlArgs),
    /// Convert ssh config file and ssh folder containing private keys into a single YAML file.
    Ssh(SshArgs),
}

#[derive(Args, Debug)]
pub struct YamlArgs {
    /// Input file, needs to be a Yaml file, previously generated with this program.
    pub input: PathBuf,

    /// SSH directory which will be containing all private keys. Default is ./ssh
    #[arg(short = 'k', long = "keys-directory")]
    pub keys_directory: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct SshArgs {
    /// Input file, needs to be a SSH Config file
    pub input: PathBuf,

    /// Directory where to read SSH private keys. Read paths from ssh config file by default.
    #[arg(short = 'k', long = "keys-directory")]
    pub keys_directory: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output file.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Unsecurely prints to stdout (useful for pipes).
    #[arg(short = 'u', long = "unsecure")]
    pub unsecure: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("Use --unsecure (-u) to unsafely print secrets to stdout or --output (-o) file.")]
    MissingDestination,
    #[error("You can't mix --unsecure (-u) and --output (-o) options.")]
    ConflictingDestinations,
}

impl UsageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::MissingDestination => 1,
            UsageError::ConflictingDestinations => 2,
        }
    }
}

impl Cli {
    /// Checks the output flags of whichever convert subcommand was given.
    pub fn destination(&self) -> Result<Destination, UsageError> {
        let Commands::Convert(command) = &self.command;
        match command {
            ConvertCommand::Yaml(args) => args.output.destination(),
            ConvertCommand::Ssh(args) => args.output.destination(),
        }
    }
}

impl OutputArgs {
    pub fn destination(&self) -> Result<Destination, UsageError> {
        match (&self.output, self.unsecure) {
            (Some(_), true) => Err(UsageError::ConflictingDestinations),
            (Some(path), false) => Ok(Destination::File(path.clone())),
            (None, true) => Ok(Destination::Stdout),
            (None, false) => Err(UsageError::MissingDestination),
        }
    }
}
