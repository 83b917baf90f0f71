//! `tsc-agent` — a Double DQN agent for discrete signal control.
//!
//! Value-based off-policy learning with the classic stabilizers: experience
//! replay to decorrelate updates, a periodically synchronized target network
//! for stable bootstrap targets, and the double-estimator trick (the online
//! network picks the next action, the target network prices it) to curb
//! overestimation bias.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`network`]  | `QNetwork` MLP + `QNetworkConfig`                      |
//! | [`replay`]   | `Transition`, bounded FIFO `ReplayBuffer`              |
//! | [`schedule`] | `EpsilonSchedule` (geometric decay to a floor)         |
//! | [`context`]  | `TrainingContext`, `TrainingPhase`                     |
//! | [`device`]   | backend aliases + one-shot device resolution           |
//! | [`agent`]    | `DqnAgent`, `AgentConfig`                              |
//! | [`error`]    | `AgentError`, `AgentResult`                            |
//!
//! The crate is deliberately simulation-agnostic: observations are plain
//! `&[f32]` feature vectors and actions are indices into a discrete space,
//! so the same agent trains against any environment with that interface.

pub mod agent;
pub mod context;
pub mod device;
pub mod error;
pub mod network;
pub mod replay;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use agent::{AgentConfig, DqnAgent};
pub use context::{TrainingContext, TrainingPhase};
pub use device::{DefaultBackend, default_device};
pub use error::{AgentError, AgentResult};
pub use network::{QNetwork, QNetworkConfig};
pub use replay::{ReplayBuffer, Transition};
pub use schedule::EpsilonSchedule;
