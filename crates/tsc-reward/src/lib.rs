//! `tsc-reward` — the multi-objective reward for signal-control policies.
//!
//! The scalar a learning agent sees each tick is a weighted sum of five
//! normalized terms (all penalties, so the ideal tick scores just below
//! zero):
//!
//! | Term        | Measures                                    | Sign |
//! |-------------|---------------------------------------------|------|
//! | throughput  | total queued entities                       | −    |
//! | fairness    | Gini coefficient over per-lane waits        | −    |
//! | safety      | risky events reported by the safety layer   | −    |
//! | pedestrian  | pedestrian wait-seconds accrued this tick   | −    |
//! | efficiency  | phase churn (switching away from young green)| −   |
//!
//! Weights are configuration, not code: policy behavior is tuned by changing
//! [`RewardWeights`], never by editing the scoring formula.

pub mod calculator;
pub mod gini;


pub use calculator::{RewardCalculator, RewardConfig, RewardError, RewardInput, RewardWeights};
pub use gini::gini;
