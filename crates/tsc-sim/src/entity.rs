//! A queued entity — vehicle, emergency vehicle, or pedestrian.

use tsc_core::{Approach, EntityId, EntityKind, Lane, SimClock, Tick, TurnMovement};

/// One waiting road user.
///
/// Created on arrival, destroyed on dispatch (or, for pedestrians, when the
/// crossing window elapses).  An entity sits in exactly one queue for its
/// whole life; its wait time is derived from the clock rather than stored,
/// so it can never drift.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub approach: Approach,
    /// Intended movement.  Pedestrians always record `Straight`; their queue
    /// is the approach's crosswalk, not a vehicle lane.
    pub movement: TurnMovement,
    pub arrival_tick: Tick,
}

impl Entity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        approach: Approach,
        movement: TurnMovement,
        arrival_tick: Tick,
    ) -> Self {
        Self { id, kind, approach, movement, arrival_tick }
    }

    /// The vehicle lane this entity occupies.
    #[inline]
    pub fn lane(&self) -> Lane {
        Lane::new(self.approach, self.movement)
    }

    /// Seconds waited so far (current time − arrival time).
    #[inline]
    pub fn wait_secs(&self, clock: &SimClock) -> u32 {
        clock.secs_for_ticks(clock.current_tick.since(self.arrival_tick)) as u32
    }
}
