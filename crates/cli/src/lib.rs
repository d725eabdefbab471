pub mod commands;
pub mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use orglens_core::config::{AppConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "orglens",
    about = "Organizational hierarchy analyzer",
    long_about = "Build an organizational hierarchy from a flat employee CSV and report salary-band compliance and overlong reporting lines.",
    after_help = "Examples:\n  orglens analyze employees.csv\n  orglens analyze employees.csv --max-depth 4 --json\n  orglens config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Validate the hierarchy and report salary-band and reporting-line findings"
    )]
    Analyze {
        #[arg(help = "Path to the employee CSV (Id,firstName,lastName,salary,managerId)")]
        path: PathBuf,
        #[arg(long, help = "Maximum allowed reporting-line depth (overrides config)")]
        max_depth: Option<u32>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Path to an orglens.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze { path, max_depth, json, config } => {
            commands::analyze::run(&path, max_depth, json, config.as_deref())
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global tracing subscriber per the logging config.
/// Idempotent so command functions stay callable from tests.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let result = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
    let _ = result;
}
