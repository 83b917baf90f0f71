//! Urgency-ordered dispatch of green movements.
//!
//! The ordering is rebuilt from scratch every tick out of the current waits
//! and kind weights — no heap survives between ticks, so service order is a
//! pure function of queue state and trivially deterministic.
//!
//! Urgency is `wait_secs × kind_weight`: regular vehicles weigh 1, emergency
//! vehicles weigh enough to outrank anything, and pedestrian weight climbs
//! sharply as their crossing window runs out.  Ties break by earliest
//! arrival, then approach index.  Once the per-lane service capacity is
//! reached the remainder stays queued and keeps accruing wait.

use tsc_core::{Approach, EntityKind, Lane, SimClock, Tick};
use tsc_signal::{Protection, SignalPhase};

use crate::entity::Entity;
use crate::error::{SimError, SimResult};
use crate::queues::LaneQueues;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerConfig {
    /// Entities served per green lane (or crosswalk) per tick.
    pub service_per_lane: usize,
    /// Urgency weight of a regular vehicle.
    pub regular_weight: f64,
    /// Urgency weight of an emergency vehicle; dwarfs everything else.
    pub emergency_weight: f64,
    /// Base urgency weight of a pedestrian; scaled up by window pressure.
    pub pedestrian_bias: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            service_per_lane: 2,
            regular_weight: 1.0,
            emergency_weight: 10_000.0,
            pedestrian_bias: 20.0,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.service_per_lane == 0 {
            return Err(SimError::Config("service capacity must be positive".into()));
        }
        for (name, w) in [
            ("regular_weight", self.regular_weight),
            ("emergency_weight", self.emergency_weight),
            ("pedestrian_bias", self.pedestrian_bias),
        ] {
            if !w.is_finite() || w <= 0.0 {
                return Err(SimError::Config(format!(
                    "scheduler weight `{name}` must be positive, got {w}"
                )));
            }
        }
        Ok(())
    }
}

// ── Internal candidate bookkeeping ────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq)]
enum Source {
    Vehicle(Lane),
    Crosswalk(Approach),
}

struct Candidate {
    source: Source,
    urgency: f64,
    arrival: Tick,
    approach_index: usize,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Stateless per-tick dispatcher.
pub struct PriorityScheduler {
    config: SchedulerConfig,
}

impl PriorityScheduler {
    pub fn new(config: SchedulerConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn urgency(&self, entity: &Entity, clock: &SimClock, window: Option<(u32, u32)>) -> f64 {
        let wait = entity.wait_secs(clock) as f64;
        let weight = match entity.kind {
            EntityKind::Regular => self.config.regular_weight,
            EntityKind::Emergency => self.config.emergency_weight,
            EntityKind::Pedestrian => {
                // Pressure rises as the crossing window shrinks.
                let (remaining, total) = window.unwrap_or((1, 1));
                self.config.pedestrian_bias * total as f64 / remaining.max(1) as f64
            }
        };
        // A fresh arrival still outranks an empty lane; keep urgency nonzero.
        (wait + 1.0) * weight
    }

    /// Serve the green movements of `phase`, removing dispatched entities
    /// from their queues and returning them in service order.
    ///
    /// `gap_open` answers whether a yielding lane currently sees a usable
    /// gap in conflicting protected traffic.  `ped_window` is the scramble's
    /// `(remaining, total)` crossing window; pedestrians dispatch only while
    /// it is open.
    pub fn dispatch(
        &self,
        phase: SignalPhase,
        queues: &mut LaneQueues,
        clock: &SimClock,
        gap_open: impl Fn(Lane) -> bool,
        ped_window: Option<(u32, u32)>,
    ) -> Vec<Entity> {
        let cap = self.config.service_per_lane;
        let mut candidates: Vec<Candidate> = Vec::new();

        for &(lane, protection) in phase.vehicle_grants() {
            if protection == Protection::Yielding && !gap_open(lane) {
                continue;
            }
            for entity in queues.lane(lane).iter().take(cap) {
                candidates.push(Candidate {
                    source: Source::Vehicle(lane),
                    urgency: self.urgency(entity, clock, None),
                    arrival: entity.arrival_tick,
                    approach_index: lane.approach.index(),
                });
            }
        }

        if ped_window.is_some_and(|(remaining, _)| remaining > 0) {
            for &approach in phase.crosswalks() {
                for entity in queues.crosswalk(approach).iter().take(cap) {
                    candidates.push(Candidate {
                        source: Source::Crosswalk(approach),
                        urgency: self.urgency(entity, clock, ped_window),
                        arrival: entity.arrival_tick,
                        approach_index: approach.index(),
                    });
                }
            }
        }

        // Urgency descending, then FIFO by arrival, then approach index.
        candidates.sort_by(|a, b| {
            b.urgency
                .partial_cmp(&a.urgency)
                .expect("urgency is finite")
                .then(a.arrival.cmp(&b.arrival))
                .then(a.approach_index.cmp(&b.approach_index))
        });

        // Candidates are FIFO prefixes of their queues, and within one queue
        // the ordering above preserves arrival order, so popping the front
        // always yields the intended entity.
        let mut served = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let entity = match candidate.source {
                Source::Vehicle(lane) => queues.lane_mut(lane).pop_front(),
                Source::Crosswalk(approach) => queues.crosswalk_mut(approach).pop_front(),
            };
            if let Some(entity) = entity {
                served.push(entity);
            }
        }
        served
    }
}
