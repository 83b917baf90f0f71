//! Strongly typed, zero-cost identifier wrappers.

use std::fmt;

/// Identifier of a simulated entity (vehicle, emergency vehicle, pedestrian).
///
/// Assigned monotonically by the simulation core and never reused within an
/// episode, so an `EntityId` seen in two snapshots refers to the same entity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    /// The first ID handed out after a reset.
    pub const FIRST: EntityId = EntityId(0);

    /// Return this ID and advance `self` to the next one.
    #[inline]
    pub fn take(&mut self) -> EntityId {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}
