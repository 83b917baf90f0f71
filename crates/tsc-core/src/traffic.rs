//! Intersection vocabulary shared across all `tsc-*` crates.
//!
//! A single 4-way intersection: four approaches, each owning three movement
//! lanes (straight, left, right) plus one crosswalk.  All enums here are
//! closed — schedulers and reward code match them exhaustively, so adding a
//! variant is a deliberate, compiler-checked change.

use std::fmt;

// ── Approach ──────────────────────────────────────────────────────────────────

/// One of the four compass approaches to the intersection.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    /// All approaches in canonical (tie-breaking) order.
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::South,
        Approach::East,
        Approach::West,
    ];

    /// Stable index into per-approach arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::South => 1,
            Approach::East => 2,
            Approach::West => 3,
        }
    }

    /// The approach facing this one across the intersection.
    #[inline]
    pub fn opposite(self) -> Approach {
        match self {
            Approach::North => Approach::South,
            Approach::South => Approach::North,
            Approach::East => Approach::West,
            Approach::West => Approach::East,
        }
    }

    /// `true` when `other` enters on the crossing axis.
    #[inline]
    pub fn is_perpendicular_to(self, other: Approach) -> bool {
        self != other && self.opposite() != other
    }

    /// Single-letter label, useful for logs and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Approach::North => "N",
            Approach::South => "S",
            Approach::East => "E",
            Approach::West => "W",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TurnMovement ──────────────────────────────────────────────────────────────

/// The movement a vehicle intends through the intersection.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnMovement {
    #[default]
    Straight,
    Left,
    Right,
}

impl TurnMovement {
    pub const ALL: [TurnMovement; 3] = [
        TurnMovement::Straight,
        TurnMovement::Left,
        TurnMovement::Right,
    ];

    /// Stable index into per-movement arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            TurnMovement::Straight => 0,
            TurnMovement::Left => 1,
            TurnMovement::Right => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnMovement::Straight => "straight",
            TurnMovement::Left => "left",
            TurnMovement::Right => "right",
        }
    }
}

impl fmt::Display for TurnMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// An (approach, movement) pair — the unit of queueing and signal grants.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub approach: Approach,
    pub movement: TurnMovement,
}

impl Lane {
    pub const COUNT: usize = 12;

    #[inline]
    pub const fn new(approach: Approach, movement: TurnMovement) -> Self {
        Self { approach, movement }
    }

    /// Flat index in [0, 12) for dense per-lane arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.approach.index() * TurnMovement::ALL.len() + self.movement.index()
    }

    /// All twelve lanes in canonical order (approach-major).
    pub fn all() -> impl Iterator<Item = Lane> {
        Approach::ALL.into_iter().flat_map(|approach| {
            TurnMovement::ALL
                .into_iter()
                .map(move |movement| Lane::new(approach, movement))
        })
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.approach, self.movement)
    }
}

// ── EntityKind ────────────────────────────────────────────────────────────────

/// Classification of a queued entity.  Closed set: the priority scheduler and
/// the reward calculator match this exhaustively.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// Ordinary vehicle.
    Regular,
    /// Siren-running vehicle; preempts all other service.
    Emergency,
    /// Person waiting at a crosswalk.
    Pedestrian,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Regular => "vehicle",
            EntityKind::Emergency => "emergency",
            EntityKind::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
