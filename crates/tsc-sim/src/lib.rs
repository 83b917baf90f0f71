//! `tsc-sim` — the single-intersection discrete-event simulation core.
//!
//! # Tick loop
//!
//! [`TrafficEnv::step`] advances one fixed time increment:
//!
//! ```text
//! ① Arrivals   — stochastic vehicle/pedestrian/emergency generation
//! ② Constraint — the requested phase passes the SafetyEnforcer, which may
//!                substitute an emergency or anti-starvation request
//! ③ Signal     — the PhaseController accepts/rejects/defers the request
//!                and advances its timers (clearances, max green)
//! ④ Dispatch   — the PriorityScheduler serves green lanes up to capacity
//! ⑤ Walk phase — pedestrian crossing windows open, tick down, and expire
//! ⑥ Reward     — the multi-objective calculator scores the tick
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`entity`]    | `Entity` — a queued vehicle or pedestrian             |
//! | [`queues`]    | `LaneQueues` — 12 vehicle FIFOs + 4 crosswalk FIFOs   |
//! | [`arrivals`]  | `ArrivalEngine`, time-of-day demand patterns          |
//! | [`scheduler`] | `PriorityScheduler` — urgency-ordered dispatch        |
//! | [`state`]     | `IntersectionState` snapshot + feature encoding       |
//! | [`env`]       | `TrafficEnv` — `reset` / `step` / `snapshot`          |
//! | [`error`]     | `SimError`, `SimResult`                               |

pub mod arrivals;
pub mod entity;
pub mod env;
pub mod error;
pub mod queues;
pub mod scheduler;
pub mod state;


pub use arrivals::{ArrivalConfig, ArrivalEngine, TurnSplit};
pub use entity::Entity;
pub use env::{Action, EnvConfig, Step, StepInfo, TrafficEnv};
pub use error::{SimError, SimResult};
pub use queues::LaneQueues;
pub use scheduler::{PriorityScheduler, SchedulerConfig};
pub use state::IntersectionState;
