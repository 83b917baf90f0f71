//! Per-lane FIFO storage for waiting entities.
//!
//! Twelve vehicle lanes (4 approaches × 3 movements) plus four crosswalk
//! queues.  Everything derived — emergency flags, max waits, starvation
//! candidates — is computed on demand from the queues, so the invariants
//! "an entity is in at most one queue" and "emergency flag ⇔ an emergency
//! entity is queued" hold by construction.

use std::collections::VecDeque;

use tsc_core::{Approach, EntityKind, Lane, SimClock};
use tsc_signal::{SignalPhase, phase_serving};

use crate::entity::Entity;

/// All waiting entities at the intersection.
#[derive(Default)]
pub struct LaneQueues {
    vehicles: [VecDeque<Entity>; Lane::COUNT],
    crosswalks: [VecDeque<Entity>; 4],
}

impl LaneQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        for q in &mut self.vehicles {
            q.clear();
        }
        for q in &mut self.crosswalks {
            q.clear();
        }
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Queue an arriving entity in its lane (or crosswalk for pedestrians).
    pub fn push(&mut self, entity: Entity) {
        match entity.kind {
            EntityKind::Pedestrian => {
                self.crosswalks[entity.approach.index()].push_back(entity);
            }
            EntityKind::Regular | EntityKind::Emergency => {
                self.vehicles[entity.lane().index()].push_back(entity);
            }
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn lane(&self, lane: Lane) -> &VecDeque<Entity> {
        &self.vehicles[lane.index()]
    }

    #[inline]
    pub fn lane_mut(&mut self, lane: Lane) -> &mut VecDeque<Entity> {
        &mut self.vehicles[lane.index()]
    }

    #[inline]
    pub fn crosswalk(&self, approach: Approach) -> &VecDeque<Entity> {
        &self.crosswalks[approach.index()]
    }

    #[inline]
    pub fn crosswalk_mut(&mut self, approach: Approach) -> &mut VecDeque<Entity> {
        &mut self.crosswalks[approach.index()]
    }

    /// Total queued entities, vehicles and pedestrians.
    pub fn total_len(&self) -> usize {
        let v: usize = self.vehicles.iter().map(VecDeque::len).sum();
        let p: usize = self.crosswalks.iter().map(VecDeque::len).sum();
        v + p
    }

    /// Pedestrians currently waiting across all crosswalks.
    pub fn pedestrians_waiting(&self) -> usize {
        self.crosswalks.iter().map(VecDeque::len).sum()
    }

    // ── Derived observations ──────────────────────────────────────────────

    /// Longest wait (seconds) at the head of each vehicle lane.  FIFO order
    /// means the head is always the oldest entry.
    pub fn lane_max_waits(&self, clock: &SimClock) -> [u32; Lane::COUNT] {
        let mut waits = [0u32; Lane::COUNT];
        for (i, q) in self.vehicles.iter().enumerate() {
            waits[i] = q.front().map_or(0, |e| e.wait_secs(clock));
        }
        waits
    }

    /// Longest wait (seconds) per crosswalk.
    pub fn crosswalk_max_waits(&self, clock: &SimClock) -> [u32; 4] {
        let mut waits = [0u32; 4];
        for (i, q) in self.crosswalks.iter().enumerate() {
            waits[i] = q.front().map_or(0, |e| e.wait_secs(clock));
        }
        waits
    }

    /// Per-approach emergency presence, derived from queue contents.
    pub fn emergency_flags(&self) -> [bool; 4] {
        let mut flags = [false; 4];
        for q in &self.vehicles {
            for e in q {
                if e.kind == EntityKind::Emergency {
                    flags[e.approach.index()] = true;
                }
            }
        }
        flags
    }

    /// Lane of the longest-waiting emergency vehicle, if any.
    pub fn emergency_lane(&self) -> Option<Lane> {
        let mut best: Option<(Lane, tsc_core::Tick)> = None;
        for q in &self.vehicles {
            for e in q {
                if e.kind == EntityKind::Emergency {
                    match best {
                        Some((_, arrived)) if arrived <= e.arrival_tick => {}
                        _ => best = Some((e.lane(), e.arrival_tick)),
                    }
                }
            }
        }
        best.map(|(lane, _)| lane)
    }

    /// The longest-waiting queue that `phase` does not grant, reported as
    /// (serving phase, wait seconds).  This is the starvation candidate the
    /// safety layer compares against its threshold.
    pub fn starvation_candidate(
        &self,
        phase: SignalPhase,
        clock: &SimClock,
    ) -> Option<(SignalPhase, u32)> {
        let mut best: Option<(SignalPhase, u32)> = None;

        for lane in Lane::all() {
            if phase.serves(lane).is_some() {
                continue;
            }
            if let Some(front) = self.lane(lane).front() {
                let wait = front.wait_secs(clock);
                if best.is_none_or(|(_, w)| wait > w) {
                    best = Some((phase_serving(lane), wait));
                }
            }
        }

        if !phase.is_pedestrian() {
            for approach in Approach::ALL {
                if let Some(front) = self.crosswalk(approach).front() {
                    let wait = front.wait_secs(clock);
                    if best.is_none_or(|(_, w)| wait > w) {
                        best = Some((SignalPhase::PedestrianScramble, wait));
                    }
                }
            }
        }

        best
    }
}
