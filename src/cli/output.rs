//! Output formatting utilities for CLI.

#![allow(clippy::cast_precision_loss)]

use geoquest::sim::GameReport;
use serde::Serialize;
use std::fmt::Write;

/// Aggregate statistics over simulated games.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct SimStats {
    /// Games played.
    pub(super) games_played: u64,
    /// Games that covered every region.
    pub(super) completed: u64,
    /// Sum of final scores.
    total_score: i64,
    /// Sum of squared final scores for the std dev.
    score_sq_sum: f64,
    /// Lowest final score.
    min_score: Option<i32>,
    /// Highest final score.
    max_score: Option<i32>,
    region_correct: u64,
    region_wrong: u64,
    city_correct: u64,
    city_wrong: u64,
    missed_clicks: u64,
    total_ms: u64,
}

impl SimStats {
    /// Add one game to the stats.
    pub(super) fn add_report(&mut self, report: &GameReport) {
        let score = report.final_score;
        self.games_played += 1;
        self.completed += u64::from(report.completed);
        self.total_score += i64::from(score);
        self.score_sq_sum += f64::from(score) * f64::from(score);
        self.min_score = Some(self.min_score.map_or(score, |m| m.min(score)));
        self.max_score = Some(self.max_score.map_or(score, |m| m.max(score)));
        self.region_correct += u64::from(report.region_correct);
        self.region_wrong += u64::from(report.region_wrong);
        self.city_correct += u64::from(report.city_correct);
        self.city_wrong += u64::from(report.city_wrong);
        self.missed_clicks += u64::from(report.missed_clicks);
        self.total_ms += report.elapsed_ms;
    }

    /// Fold another partial result into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.completed += other.completed;
        self.total_score += other.total_score;
        self.score_sq_sum += other.score_sq_sum;
        self.min_score = match (self.min_score, other.min_score) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_score = match (self.max_score, other.max_score) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.region_correct += other.region_correct;
        self.region_wrong += other.region_wrong;
        self.city_correct += other.city_correct;
        self.city_wrong += other.city_wrong;
        self.missed_clicks += other.missed_clicks;
        self.total_ms += other.total_ms;
    }

    /// Average final score.
    pub(super) fn avg_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.games_played as f64
    }

    /// Final score standard deviation.
    pub(super) fn score_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let mean = self.avg_score();
        let variance = self.score_sq_sum / self.games_played as f64 - mean * mean;
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Share of region clicks that hit the target.
    pub(super) fn region_accuracy(&self) -> f64 {
        ratio(self.region_correct, self.region_correct + self.region_wrong)
    }

    /// Share of city clicks that hit the target.
    pub(super) fn city_accuracy(&self) -> f64 {
        ratio(self.city_correct, self.city_correct + self.city_wrong)
    }

    /// Average simulated game length in seconds.
    pub(super) fn avg_game_secs(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_ms as f64 / 1000.0 / self.games_played as f64
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimResult {
    games_played: u64,
    completed: u64,
    avg_score: f64,
    score_std_dev: f64,
    min_score: Option<i32>,
    max_score: Option<i32>,
    region_accuracy: f64,
    city_accuracy: f64,
    missed_clicks: u64,
    avg_game_secs: f64,
}

impl JsonSimResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &SimStats) -> Self {
        Self {
            games_played: stats.games_played,
            completed: stats.completed,
            avg_score: stats.avg_score(),
            score_std_dev: stats.score_std_dev(),
            min_score: stats.min_score,
            max_score: stats.max_score,
            region_accuracy: stats.region_accuracy(),
            city_accuracy: stats.city_accuracy(),
            missed_clicks: stats.missed_clicks,
            avg_game_secs: stats.avg_game_secs(),
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_sim_text(stats: &SimStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");
    let _ = writeln!(
        output,
        "  Completed:        {}/{}",
        stats.completed, stats.games_played
    );
    let _ = writeln!(
        output,
        "  Final score:      {:.1} (+/- {:.1})",
        stats.avg_score(),
        stats.score_std_dev()
    );
    if let (Some(min), Some(max)) = (stats.min_score, stats.max_score) {
        let _ = writeln!(output, "  Score range:      {min} .. {max}");
    }
    let _ = writeln!(
        output,
        "  Region accuracy:  {:.1}%",
        stats.region_accuracy() * 100.0
    );
    let _ = writeln!(
        output,
        "  City accuracy:    {:.1}%",
        stats.city_accuracy() * 100.0
    );
    let _ = writeln!(output, "  Missed clicks:    {}", stats.missed_clicks);
    let _ = writeln!(output, "  Avg game length:  {:.0}s", stats.avg_game_secs());

    output
}
