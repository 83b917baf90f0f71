//! The 11 signal-phase configurations and the movement-conflict rules.
//!
//! # Design
//!
//! Each phase is a *static* description of which (approach, movement) lanes
//! may proceed and at which protection tier:
//!
//! - **Protected** grants have the right of way outright.  Within any single
//!   phase the protected set is pairwise conflict-free (enforced by test).
//! - **Yielding** grants may conflict with a protected grant of the same
//!   phase (a shared left against the opposing through, right-on-red).  The
//!   dispatcher only serves them when a sufficient gap exists in the
//!   conflicting protected traffic.
//!
//! Clearance phases grant nothing; they exist so that a switch between
//! conflicting configurations never exposes two conflicting greens, even for
//! an instant.

use tsc_core::{Approach, Lane, TurnMovement};

// ── Protection tier ───────────────────────────────────────────────────────────

/// How strongly a phase grants a lane.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protection {
    /// Unconditional right of way.
    Protected,
    /// May proceed only through a detected gap in conflicting traffic.
    Yielding,
}

// ── SignalPhase ───────────────────────────────────────────────────────────────

/// One of the 11 discrete signal configurations.
///
/// The discriminants are the action indices of the control interface, so
/// `phase as u8` and [`SignalPhase::from_index`] form a bijection on 0..=10.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SignalPhase {
    /// N/S straight and right, protected.
    NorthSouthThrough = 0,
    /// E/W straight and right, protected.
    EastWestThrough = 1,
    /// N/S through plus permissive (yielding) lefts.
    NorthSouthSharedLeft = 2,
    /// E/W through plus permissive (yielding) lefts.
    EastWestSharedLeft = 3,
    /// Opposing protected lefts, north-south axis only.
    DualLeftNorthSouth = 4,
    /// Opposing protected lefts, east-west axis only.
    DualLeftEastWest = 5,
    /// All four crosswalks walk; no vehicle movement.
    PedestrianScramble = 6,
    /// N/S right turns against an otherwise all-red intersection.
    RightOnRedNorthSouth = 7,
    /// E/W right turns against an otherwise all-red intersection.
    RightOnRedEastWest = 8,
    /// Empty interval after the scramble while stragglers finish crossing.
    PedestrianClearance = 9,
    /// Empty interval inserted between conflicting vehicle phases.
    AllRedClearance = 10,
}

use Approach::{East, North, South, West};
use Protection::{Protected, Yielding};
use SignalPhase::*;
use TurnMovement::{Left, Right, Straight};

const fn lane(approach: Approach, movement: TurnMovement) -> Lane {
    Lane::new(approach, movement)
}

/// Static grant tables, indexed by phase.
static NS_THROUGH: [(Lane, Protection); 4] = [
    (lane(North, Straight), Protected),
    (lane(South, Straight), Protected),
    (lane(North, Right), Protected),
    (lane(South, Right), Protected),
];
static EW_THROUGH: [(Lane, Protection); 4] = [
    (lane(East, Straight), Protected),
    (lane(West, Straight), Protected),
    (lane(East, Right), Protected),
    (lane(West, Right), Protected),
];
static NS_SHARED: [(Lane, Protection); 6] = [
    (lane(North, Straight), Protected),
    (lane(South, Straight), Protected),
    (lane(North, Right), Protected),
    (lane(South, Right), Protected),
    (lane(North, Left), Yielding),
    (lane(South, Left), Yielding),
];
static EW_SHARED: [(Lane, Protection); 6] = [
    (lane(East, Straight), Protected),
    (lane(West, Straight), Protected),
    (lane(East, Right), Protected),
    (lane(West, Right), Protected),
    (lane(East, Left), Yielding),
    (lane(West, Left), Yielding),
];
static NS_DUAL_LEFT: [(Lane, Protection); 2] = [
    (lane(North, Left), Protected),
    (lane(South, Left), Protected),
];
static EW_DUAL_LEFT: [(Lane, Protection); 2] = [
    (lane(East, Left), Protected),
    (lane(West, Left), Protected),
];
static NS_RIGHT_ON_RED: [(Lane, Protection); 2] = [
    (lane(North, Right), Yielding),
    (lane(South, Right), Yielding),
];
static EW_RIGHT_ON_RED: [(Lane, Protection); 2] = [
    (lane(East, Right), Yielding),
    (lane(West, Right), Yielding),
];
static NO_GRANTS: [(Lane, Protection); 0] = [];

impl SignalPhase {
    /// All phases in action-index order.
    pub const ALL: [SignalPhase; 11] = [
        NorthSouthThrough,
        EastWestThrough,
        NorthSouthSharedLeft,
        EastWestSharedLeft,
        DualLeftNorthSouth,
        DualLeftEastWest,
        PedestrianScramble,
        RightOnRedNorthSouth,
        RightOnRedEastWest,
        PedestrianClearance,
        AllRedClearance,
    ];

    /// Number of phases (= size of the action space).
    pub const COUNT: usize = 11;

    /// Action index of this phase.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Phase for an action index, `None` outside 0..=10.
    pub fn from_index(index: u8) -> Option<SignalPhase> {
        Self::ALL.get(index as usize).copied()
    }

    /// Vehicle lanes this phase grants, with their protection tier.
    pub fn vehicle_grants(self) -> &'static [(Lane, Protection)] {
        match self {
            NorthSouthThrough => &NS_THROUGH,
            EastWestThrough => &EW_THROUGH,
            NorthSouthSharedLeft => &NS_SHARED,
            EastWestSharedLeft => &EW_SHARED,
            DualLeftNorthSouth => &NS_DUAL_LEFT,
            DualLeftEastWest => &EW_DUAL_LEFT,
            RightOnRedNorthSouth => &NS_RIGHT_ON_RED,
            RightOnRedEastWest => &EW_RIGHT_ON_RED,
            PedestrianScramble | PedestrianClearance | AllRedClearance => &NO_GRANTS,
        }
    }

    /// Crosswalks with a walk signal during this phase.
    pub fn crosswalks(self) -> &'static [Approach] {
        match self {
            PedestrianScramble => &Approach::ALL,
            _ => &[],
        }
    }

    /// Protection tier this phase gives `lane`, `None` when red.
    pub fn serves(self, lane: Lane) -> Option<Protection> {
        self.vehicle_grants()
            .iter()
            .find(|(l, _)| *l == lane)
            .map(|(_, p)| *p)
    }

    /// `true` for the two empty clearance intervals.
    #[inline]
    pub fn is_clearance(self) -> bool {
        matches!(self, PedestrianClearance | AllRedClearance)
    }

    /// `true` when this phase grants any crosswalk.
    #[inline]
    pub fn is_pedestrian(self) -> bool {
        !self.crosswalks().is_empty()
    }

    /// Would switching `self → other` momentarily overlap conflicting
    /// movements?  Only *protected* grants count: yielding grants are
    /// gap-gated at dispatch time, exactly as they are within one phase.
    /// Clearance phases conflict with nothing — that is their purpose.
    pub fn conflicts_with(self, other: SignalPhase) -> bool {
        let protected = |phase: SignalPhase| {
            phase
                .vehicle_grants()
                .iter()
                .filter(|(_, p)| *p == Protected)
                .map(|(l, _)| *l)
        };
        // A walk signal conflicts with any protected vehicle grant.
        if self.is_pedestrian() && protected(other).next().is_some() {
            return true;
        }
        if other.is_pedestrian() && protected(self).next().is_some() {
            return true;
        }
        for a in protected(self) {
            for b in protected(other) {
                if lanes_conflict(a, b) {
                    return true;
                }
            }
        }
        false
    }

    /// The phase the controller rotates to when max-green expires without an
    /// external request: hand the crossing axis its through phase.
    pub fn natural_successor(self) -> SignalPhase {
        match self {
            NorthSouthThrough | NorthSouthSharedLeft | DualLeftNorthSouth
            | RightOnRedNorthSouth => EastWestThrough,
            EastWestThrough | EastWestSharedLeft | DualLeftEastWest | RightOnRedEastWest
            | PedestrianScramble => NorthSouthThrough,
            // Clearances exit via their latched target, not rotation.
            PedestrianClearance | AllRedClearance => NorthSouthThrough,
        }
    }
}

// ── Conflict rules ────────────────────────────────────────────────────────────

/// Do two vehicle movements cross paths inside the intersection?
///
/// Rules, in order:
/// - lanes of the same approach never conflict;
/// - opposing approaches: straights, rights, and paired lefts are compatible,
///   but a left crosses the opposing straight;
/// - perpendicular approaches: everything conflicts except right-vs-right
///   (both hug their own curb).
pub fn lanes_conflict(a: Lane, b: Lane) -> bool {
    if a.approach == b.approach {
        return false;
    }
    if a.approach.opposite() == b.approach {
        matches!(
            (a.movement, b.movement),
            (TurnMovement::Left, TurnMovement::Straight)
                | (TurnMovement::Straight, TurnMovement::Left)
        )
    } else {
        !(a.movement == TurnMovement::Right && b.movement == TurnMovement::Right)
    }
}

/// The phase that grants `lane` protected green.
///
/// Every servable lane has one: straights and rights are served by their
/// axis through phase, lefts by the axis dual-left phase.  This is the
/// target the safety layer steers toward for emergencies and starvation.
pub fn phase_serving(lane: Lane) -> SignalPhase {
    let north_south = !lane.approach.is_perpendicular_to(Approach::North);
    match (lane.movement, north_south) {
        (TurnMovement::Left, true) => DualLeftNorthSouth,
        (TurnMovement::Left, false) => DualLeftEastWest,
        (_, true) => NorthSouthThrough,
        (_, false) => EastWestThrough,
    }
}
