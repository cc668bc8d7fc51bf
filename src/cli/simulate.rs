//! Simulate command implementation.

#![allow(clippy::cast_precision_loss)]

use super::output::{format_sim_text, JsonSimResult, SimStats};
use super::{CliError, GameArgs, SimulateFormat};
use geoquest::sim::{play_game, BotProfile};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Options for the simulate command.
#[derive(Debug, Clone)]
pub(crate) struct SimulateOptions {
    /// Number of games.
    pub(crate) games: u64,
    /// Worker threads (default: CPU count).
    pub(crate) threads: Option<usize>,
    /// Bot behavior.
    pub(crate) profile: BotProfile,
    /// Output format.
    pub(crate) format: SimulateFormat,
    /// Show a progress bar.
    pub(crate) progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the game data cannot be loaded or output fails.
pub(crate) fn execute(game: &GameArgs, options: &SimulateOptions) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&options.profile.accuracy) {
        return Err(CliError::new("accuracy must be between 0 and 1"));
    }

    let (config, dataset) = game.load()?;
    let mode = game.mode();
    let base_seed = game.seed();

    // Set thread pool size if specified
    if let Some(num_threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if options.progress {
        let pb = ProgressBar::new(options.games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    info!(games = options.games, base_seed, ?mode, "simulation started");
    let start = Instant::now();

    // Each worker folds into its own stats; partial results merge at the end
    let stats = (0..options.games)
        .into_par_iter()
        .fold(SimStats::default, |mut local, i| {
            let seed = base_seed.wrapping_add(i);
            let report = play_game(Arc::clone(&dataset), config, mode, seed, options.profile);
            local.add_report(&report);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SimStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    info!(
        games = stats.games_played,
        secs = duration.as_secs_f64(),
        "simulation finished"
    );

    match options.format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_sim_text(&stats));
            println!();
            println!(
                "Seeds: {base_seed}..{} | Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                base_seed.wrapping_add(options.games),
                duration.as_secs_f64()
            );
        }
        SimulateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSimResult::from_stats(&stats))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
