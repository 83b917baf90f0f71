//! `tsc-train` — the episodic training loop.
//!
//! Couples [`tsc_sim::TrafficEnv`] and [`tsc_agent::DqnAgent`] in the strict
//! synchronous sequence
//!
//! ```text
//! observe state → act → env.step → observe transition → learn
//! ```
//!
//! with no concurrent mutation anywhere: the loop blocks on each stage
//! before starting the next.  Long runs are interruptible between episodes
//! only — an episode, once started, runs to its tick budget.
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`trainer`] | `Trainer`, `TrainerConfig`, `EpisodeStats`, `evaluate` |
//! | [`observer`]| `TrainObserver` hook trait, `NoopObserver`             |
//! | [`metrics`] | `CsvMetricsWriter` episode log                         |
//! | [`error`]   | `TrainError`, `TrainResult`                            |

pub mod error;
pub mod metrics;
pub mod observer;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use error::{TrainError, TrainResult};
pub use metrics::CsvMetricsWriter;
pub use observer::{NoopObserver, TrainObserver};
pub use trainer::{EpisodeStats, Trainer, TrainerConfig};
