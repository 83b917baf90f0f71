//! `tsc-signal` — signal phases, the phase-controller state machine, and the
//! safety-constraint layer.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`phase`]      | `SignalPhase` (11 configurations), movement conflict rules |
//! | [`controller`] | `PhaseController`, `PhaseTiming`, transition decisions     |
//! | [`safety`]     | `SafetyEnforcer`, `SafetyConfig`, `RuleTag`                |
//! | [`error`]      | `SignalError`, `SignalResult`                              |
//!
//! # Hard guarantees
//!
//! - A phase never grants two conflicting movements protected green at once.
//! - Green time for a non-forced phase lies in `[min_green, max_green]`.
//! - Conflicting phase switches always pass through a clearance phase.
//! - Constraint conflicts are reported as values (`RuleTag`s), never panics.

pub mod controller;
pub mod error;
pub mod phase;
pub mod safety;

#[cfg(test)]
mod tests;

pub use controller::{PhaseChange, PhaseController, PhaseRequest, PhaseTiming, TransitionDecision};
pub use error::{SignalError, SignalResult};
pub use phase::{Protection, SignalPhase, lanes_conflict, phase_serving};
pub use safety::{ConstraintOutcome, EnforcerInput, RuleTag, SafetyConfig, SafetyEnforcer};
