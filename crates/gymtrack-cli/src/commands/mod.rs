//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod catalog;
pub mod config;
pub mod context;
pub mod display;
pub mod exercise;
pub mod history;
pub mod import;
pub mod session;
pub mod set;
pub mod workout;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use context::AppContext;

/// gymtrack - log gym sessions from the terminal
#[derive(Debug, Parser)]
#[command(name = "gymtrack")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GYMTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding session data
    #[arg(long, global = true, env = "GYMTRACK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new workout session
    Start(workout::StartArgs),

    /// Show the active session
    Status(workout::StatusArgs),

    /// Finish the active session and log it
    Finish,

    /// Discard the active session
    Cancel,

    /// Manage exercises in the active session
    #[command(subcommand)]
    Exercise(exercise::ExerciseCommand),

    /// Manage sets in the active session
    #[command(subcommand)]
    Set(set::SetCommand),

    /// Manage completed sessions
    #[command(subcommand)]
    Session(session::SessionCommand),

    /// Import sessions from a JSON export
    Import(import::ImportArgs),

    /// Show training days
    Calendar(history::CalendarArgs),

    /// Show training statistics
    Stats(history::StatsArgs),

    /// List predefined exercises
    Catalog(catalog::CatalogArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = context::config_path(cli.config.as_deref());
    let data_dir = cli.data_dir;
    let ctx = || AppContext::load(&config_path, data_dir.as_deref());

    // Dispatch to command handler
    match cli.command {
        Commands::Start(args) => workout::start(&ctx()?, args),
        Commands::Status(args) => workout::status(&ctx()?, args),
        Commands::Finish => workout::finish(&ctx()?),
        Commands::Cancel => workout::cancel(&ctx()?),
        Commands::Exercise(cmd) => exercise::execute(&ctx()?, cmd),
        Commands::Set(cmd) => set::execute(&ctx()?, cmd),
        Commands::Session(cmd) => session::execute(&ctx()?, cmd),
        Commands::Import(args) => import::execute(&ctx()?, args),
        Commands::Calendar(args) => history::calendar(&ctx()?, args),
        Commands::Stats(args) => history::stats(&ctx()?, args),
        Commands::Catalog(args) => catalog::execute(args),
        // Works without loading the config so a broken file can be reset
        Commands::Config(cmd) => config::execute(cmd, &config_path),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Keep stdout clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
