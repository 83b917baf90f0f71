//! Training observer hooks.

use crate::trainer::EpisodeStats;

/// Callbacks invoked by [`Trainer::run`][crate::Trainer::run] at episode
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers read statistics; they have
/// no channel back into the environment or the agent.
pub trait TrainObserver {
    /// Called after each completed episode.
    fn on_episode_end(&mut self, _stats: &EpisodeStats) {}

    /// Called once after the final episode.
    fn on_training_end(&mut self, _all: &[EpisodeStats]) {}
}

/// A [`TrainObserver`] that does nothing.
pub struct NoopObserver;

impl TrainObserver for NoopObserver {}
