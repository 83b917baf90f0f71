//! CSV episode-metrics log.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::error::TrainResult;
use crate::observer::TrainObserver;
use crate::trainer::EpisodeStats;

/// Writes one CSV row per training episode.
///
/// Plugs into [`Trainer::run`][crate::Trainer::run] as an observer; write
/// failures after opening are logged rather than aborting a long training
/// run.
pub struct CsvMetricsWriter {
    writer: Writer<File>,
}

impl CsvMetricsWriter {
    /// Open (or create) `path` and write the header row.
    pub fn new(path: &Path) -> TrainResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["episode", "steps", "total_reward", "mean_loss", "epsilon"])?;
        Ok(Self { writer })
    }

    fn write_row(&mut self, stats: &EpisodeStats) -> TrainResult<()> {
        self.writer.write_record(&[
            stats.episode.to_string(),
            stats.steps.to_string(),
            format!("{:.4}", stats.total_reward),
            stats.mean_loss.map_or_else(String::new, |l| format!("{l:.6}")),
            format!("{:.4}", stats.epsilon),
        ])?;
        Ok(())
    }
}

impl TrainObserver for CsvMetricsWriter {
    fn on_episode_end(&mut self, stats: &EpisodeStats) {
        if let Err(error) = self.write_row(stats) {
            log::warn!("dropping metrics row for episode {}: {error}", stats.episode);
        }
    }

    fn on_training_end(&mut self, _all: &[EpisodeStats]) {
        if let Err(error) = self.writer.flush() {
            log::warn!("failed to flush metrics file: {error}");
        }
    }
}
