//! The phase-controller state machine.
//!
//! # States and transitions
//!
//! The controller is always in exactly one [`SignalPhase`].  A transition
//! request is answered with one of three decisions:
//!
//! - **Accepted** — the phase switches now (or the request was a no-op).
//! - **Rejected** — minimum green has not elapsed and the request was not
//!   forced, or a clearance interval is in progress.
//! - **Deferred** — the target conflicts with the live phase, so the
//!   controller enters a clearance phase first and latches the target; the
//!   switch completes when the clearance interval expires.
//!
//! Re-requesting the current phase is the extension idiom: it is accepted
//! without resetting the green timer, so max-green still caps the phase.

use crate::error::{SignalError, SignalResult};
use crate::phase::SignalPhase;

// ── Timing configuration ──────────────────────────────────────────────────────

/// Hard timing bounds for every phase.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTiming {
    /// Shortest green a phase must hold before a voluntary switch.
    pub min_green_secs: u32,
    /// Longest green before the controller rotates on its own.
    pub max_green_secs: u32,
    /// Duration of [`SignalPhase::AllRedClearance`].
    pub all_red_secs: u32,
    /// Duration of [`SignalPhase::PedestrianClearance`].
    pub ped_clearance_secs: u32,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            min_green_secs: 8,
            max_green_secs: 60,
            all_red_secs: 3,
            ped_clearance_secs: 5,
        }
    }
}

impl PhaseTiming {
    /// Reject malformed timing before any controller exists.
    pub fn validate(&self) -> SignalResult<()> {
        if self.min_green_secs == 0 {
            return Err(SignalError::Config("min green must be positive".into()));
        }
        if self.min_green_secs > self.max_green_secs {
            return Err(SignalError::Config(format!(
                "min green {}s exceeds max green {}s",
                self.min_green_secs, self.max_green_secs
            )));
        }
        if self.all_red_secs == 0 || self.ped_clearance_secs == 0 {
            return Err(SignalError::Config("clearance intervals must be positive".into()));
        }
        Ok(())
    }

    /// Clearance duration owed when leaving `phase`.
    fn clearance_secs_for(&self, leaving: SignalPhase) -> u32 {
        if leaving.is_pedestrian() {
            self.ped_clearance_secs
        } else {
            self.all_red_secs
        }
    }
}

// ── Requests and decisions ────────────────────────────────────────────────────

/// A transition request submitted to the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseRequest {
    pub target: SignalPhase,
    /// Safety-layer overrides (emergency, starvation) bypass minimum green.
    pub forced: bool,
}

impl PhaseRequest {
    pub fn new(target: SignalPhase) -> Self {
        Self { target, forced: false }
    }

    pub fn forced(target: SignalPhase) -> Self {
        Self { target, forced: true }
    }
}

/// The controller's answer to a [`PhaseRequest`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionDecision {
    Accepted,
    Rejected,
    Deferred,
}

/// A state change produced by [`PhaseController::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseChange {
    /// A clearance interval finished and the latched target went green.
    ClearanceComplete(SignalPhase),
    /// Max green expired and the controller rotated to its successor
    /// (possibly via a freshly started clearance).
    MaxGreenRotation(SignalPhase),
}

// ── Controller ────────────────────────────────────────────────────────────────

struct PendingClearance {
    target: SignalPhase,
    remaining_secs: u32,
}

/// State machine over the 11 phases.  Runs for the simulation's lifetime;
/// there is no terminal state.
pub struct PhaseController {
    timing: PhaseTiming,
    current: SignalPhase,
    elapsed_secs: u32,
    pending: Option<PendingClearance>,
}

impl PhaseController {
    /// Start in the baseline north-south through phase.
    pub fn new(timing: PhaseTiming) -> SignalResult<Self> {
        timing.validate()?;
        Ok(Self {
            timing,
            current: SignalPhase::NorthSouthThrough,
            elapsed_secs: 0,
            pending: None,
        })
    }

    #[inline]
    pub fn current(&self) -> SignalPhase {
        self.current
    }

    /// Seconds the current phase has been active.
    #[inline]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// `true` while a deferred switch is waiting out its clearance interval.
    #[inline]
    pub fn in_clearance(&self) -> bool {
        self.pending.is_some()
    }

    /// Target of the in-progress deferred switch, if any.
    pub fn pending_target(&self) -> Option<SignalPhase> {
        self.pending.as_ref().map(|p| p.target)
    }

    #[inline]
    pub fn timing(&self) -> &PhaseTiming {
        &self.timing
    }

    /// Submit a transition request.  See the module docs for the decision
    /// rules.  State is only mutated on `Accepted` and `Deferred`.
    pub fn request(&mut self, request: PhaseRequest) -> TransitionDecision {
        // A clearance interval is never interrupted, not even by force:
        // the intersection is mid-handover and all approaches are red.
        if self.pending.is_some() {
            return TransitionDecision::Rejected;
        }
        if request.target == self.current {
            return TransitionDecision::Accepted;
        }
        if !request.forced && self.elapsed_secs < self.timing.min_green_secs {
            return TransitionDecision::Rejected;
        }
        if self.current.conflicts_with(request.target) {
            let clearance = if self.current.is_pedestrian() {
                SignalPhase::PedestrianClearance
            } else {
                SignalPhase::AllRedClearance
            };
            let remaining_secs = self.timing.clearance_secs_for(self.current);
            self.current = clearance;
            self.elapsed_secs = 0;
            self.pending = Some(PendingClearance {
                target: request.target,
                remaining_secs,
            });
            TransitionDecision::Deferred
        } else {
            self.current = request.target;
            self.elapsed_secs = 0;
            TransitionDecision::Accepted
        }
    }

    /// Advance phase timers by `dt_secs` of simulated time.
    ///
    /// Completes pending clearances and enforces max green by issuing the
    /// automatic rotation request when no external request arrived first.
    pub fn advance(&mut self, dt_secs: u32) -> Option<PhaseChange> {
        if let Some(pending) = self.pending.as_mut() {
            pending.remaining_secs = pending.remaining_secs.saturating_sub(dt_secs);
            if pending.remaining_secs == 0 {
                let target = pending.target;
                self.pending = None;
                self.current = target;
                self.elapsed_secs = 0;
                return Some(PhaseChange::ClearanceComplete(target));
            }
            return None;
        }

        self.elapsed_secs += dt_secs;
        if self.elapsed_secs >= self.timing.max_green_secs {
            let successor = self.current.natural_successor();
            self.request(PhaseRequest::forced(successor));
            return Some(PhaseChange::MaxGreenRotation(successor));
        }
        None
    }
}
