//! `tsc-core` — foundational types for the `tsc` traffic-signal control
//! workspace.
//!
//! This crate is a dependency of every other `tsc-*` crate.  It intentionally
//! has no `tsc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `EntityId`                                              |
//! | [`time`]    | `Tick`, `SimClock`                                      |
//! | [`rng`]     | `SimRng` (seeded, forkable random streams)              |
//! | [`traffic`] | `Approach`, `TurnMovement`, `EntityKind`, `Lane`        |
//! | [`error`]   | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod traffic;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::EntityId;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
pub use traffic::{Approach, EntityKind, Lane, TurnMovement};
