//! The safety-constraint enforcer.
//!
//! Sits between the acting policy and the [`PhaseController`]: every raw
//! request is rewritten into the request the intersection can actually honor.
//! Outcomes are plain values — a possibly substituted request plus the list
//! of rules that fired — so callers never need error handling to progress a
//! tick.  Rule tags that describe genuine hazards feed the reward's safety
//! penalty.
//!
//! Rule priority (first match substitutes the request):
//! 1. emergency override — steer to the phase serving the emergency lane,
//!    forced, unless a clearance handover is already in progress;
//! 2. starvation prevention — a lane waiting past the threshold gets a
//!    forced request for its serving phase;
//! 3. left-turn yield — expressed as the gap rule the dispatcher consults,
//!    not as a request rewrite;
//! 4. hard bounds — timing is clamped/validated at construction, and
//!    requests that conflict with the live phase are tagged as risky.

use tsc_core::Lane;

use crate::controller::{PhaseRequest, PhaseTiming};
use crate::error::{SignalError, SignalResult};
use crate::phase::{SignalPhase, phase_serving};

// ── Rule tags ─────────────────────────────────────────────────────────────────

/// A constraint rule that fired while evaluating a request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleTag {
    /// An emergency vehicle preempted the requested phase.
    EmergencyOverride,
    /// A starved lane preempted the requested phase.
    StarvationRelief,
    /// The request conflicted with the live phase and needs clearance.
    ConflictingRequest,
    /// Max green expired and the controller rotated on its own.
    MaxGreenExpired,
}

impl RuleTag {
    /// Tags that count toward the reward's risky-event penalty.
    #[inline]
    pub fn is_risky(self) -> bool {
        matches!(self, RuleTag::EmergencyOverride | RuleTag::ConflictingRequest)
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Tunable limits for the enforcer.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyConfig {
    /// A lane whose longest wait reaches this bound gets forced service.
    pub starvation_secs: u32,
    /// A yielding grant dispatches only while every conflicting protected
    /// lane holds at most this many queued vehicles.
    pub yield_gap_vehicles: usize,
    pub timing: PhaseTiming,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            starvation_secs: 30,
            yield_gap_vehicles: 0,
            timing: PhaseTiming::default(),
        }
    }
}

impl SafetyConfig {
    pub fn validate(&self) -> SignalResult<()> {
        self.timing.validate()?;
        if self.starvation_secs == 0 {
            return Err(SignalError::Config("starvation threshold must be positive".into()));
        }
        Ok(())
    }
}

// ── Inputs and outcome ────────────────────────────────────────────────────────

/// The slice of intersection state the enforcer reads.
#[derive(Copy, Clone, Debug)]
pub struct EnforcerInput {
    pub requested: SignalPhase,
    pub current: SignalPhase,
    /// A clearance handover is in progress (uninterruptible).
    pub in_clearance: bool,
    /// Lane of the longest-queued emergency vehicle, if any is present.
    pub emergency_lane: Option<Lane>,
    /// Serving phase of the longest-waiting queue the current phase does
    /// *not* grant, paired with that wait in seconds.  Crosswalk queues
    /// report the scramble as their serving phase.
    pub starved: Option<(SignalPhase, u32)>,
}

/// The enforcer's verdict: the request to actually submit, plus every rule
/// that fired while producing it.
#[derive(Clone, Debug)]
pub struct ConstraintOutcome {
    pub request: PhaseRequest,
    pub triggered: Vec<RuleTag>,
}

impl ConstraintOutcome {
    /// Count of tags contributing to the safety reward penalty.
    pub fn risky_events(&self) -> usize {
        self.triggered.iter().filter(|t| t.is_risky()).count()
    }
}

// ── Enforcer ──────────────────────────────────────────────────────────────────

/// Validates and rewrites phase requests against the hard safety rules.
pub struct SafetyEnforcer {
    config: SafetyConfig,
}

impl SafetyEnforcer {
    pub fn new(config: SafetyConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Gap rule consulted by the dispatcher before serving a yielding grant.
    #[inline]
    pub fn yield_gap_open(&self, conflicting_queue_len: usize) -> bool {
        conflicting_queue_len <= self.config.yield_gap_vehicles
    }

    /// Evaluate a raw request against the current intersection state.
    pub fn evaluate(&self, input: EnforcerInput) -> ConstraintOutcome {
        let mut triggered = Vec::new();

        // 1. Emergency override — forced, skipped mid-clearance.
        if let Some(lane) = input.emergency_lane {
            if !input.in_clearance {
                let target = phase_serving(lane);
                if input.current.serves(lane).is_none() {
                    triggered.push(RuleTag::EmergencyOverride);
                    return ConstraintOutcome {
                        request: PhaseRequest::forced(target),
                        triggered,
                    };
                }
                // Already serving the emergency lane: hold the phase green.
                return ConstraintOutcome {
                    request: PhaseRequest::new(input.current),
                    triggered,
                };
            }
        }

        // 2. Starvation prevention — forced at the next legal opportunity.
        if let Some((target, wait_secs)) = input.starved {
            if wait_secs >= self.config.starvation_secs && target != input.current {
                triggered.push(RuleTag::StarvationRelief);
                return ConstraintOutcome {
                    request: PhaseRequest::forced(target),
                    triggered,
                };
            }
        }

        // 4. Conflicting request — passes through (the controller defers it)
        //    but is recorded as a risky event.
        if input.requested != input.current && input.current.conflicts_with(input.requested) {
            triggered.push(RuleTag::ConflictingRequest);
        }

        ConstraintOutcome {
            request: PhaseRequest::new(input.requested),
            triggered,
        }
    }
}
