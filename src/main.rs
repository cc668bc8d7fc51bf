//! Geoquest CLI - play the map quiz in a terminal or simulate it with bots.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use cli::logging::{self, LogTarget};
use geoquest::sim::BotProfile;
use std::process::ExitCode;

/// Geoquest - find the state, then find the city
#[derive(Parser, Debug)]
#[command(name = "geoquest")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal (mouse required)
    Play {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Write logs to this file; the terminal is taken by the game
        #[arg(long)]
        log_file: Option<std::path::PathBuf>,
    },

    /// Play many games with a bot and aggregate statistics
    Simulate {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Number of games to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Chance the bot clicks the right answer (0.0-1.0)
        #[arg(long, default_value = "0.8")]
        accuracy: f64,

        /// Simulated time between bot clicks, in milliseconds
        #[arg(long, default_value = "250")]
        think_ms: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Check that a dataset file loads and every city is clickable
    Validate {
        /// Dataset file (JSON)
        #[arg(required = true)]
        dataset: std::path::PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let target = match &args.command {
        Commands::Play { log_file, .. } => log_file.clone().map_or(LogTarget::Off, LogTarget::File),
        Commands::Simulate { .. } | Commands::Validate { .. } => LogTarget::Stderr,
    };

    let result = logging::init(target).and_then(|()| match args.command {
        Commands::Play { game, .. } => cli::play::execute(&game),

        Commands::Simulate {
            game,
            games,
            threads,
            accuracy,
            think_ms,
            format,
            progress,
        } => cli::simulate::execute(
            &game,
            &cli::simulate::SimulateOptions {
                games,
                threads,
                profile: BotProfile { accuracy, think_ms },
                format,
                progress,
            },
        ),

        Commands::Validate { dataset } => cli::validate::execute(&dataset),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
