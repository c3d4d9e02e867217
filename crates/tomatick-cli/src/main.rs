use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tomatick_core::{Config, ConfigError};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod render;
mod sinks;

#[derive(Parser)]
#[command(name = "tomatick", version, about = "Tomatick Pomodoro timer")]
pub(crate) struct Cli {
    /// Config file (default: ~/.config/tomatick/config.toml)
    #[arg(long, global = true, env = "TOMATICK_CONFIG")]
    config: Option<PathBuf>,
    /// Log more to stderr (-v debug, -vv trace). TOMATICK_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive timer session
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TOMATICK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("tomatick={level},tomatick_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path),
        None => Config::path(),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run(args) => commands::run::run(args, &config_path(cli.config)?),
        Commands::Config { action } => commands::config::run(action, &config_path(cli.config)?),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
