//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; the mapping to simulated
//! seconds lives in `SimClock`:
//!
//!   sim_seconds = tick * seconds_per_tick
//!
//! Using an integer tick as the canonical unit keeps all scheduling and
//! wait-time arithmetic exact (no floating-point drift).  The default tick is
//! one simulated second, which matches signal-timing constants (minimum green,
//! clearance intervals) that are specified in whole seconds.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one tick represents.  Default: 1.
    pub seconds_per_tick: u32,
    /// The current tick — advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick zero with the given resolution.
    pub fn new(seconds_per_tick: u32) -> Self {
        Self {
            seconds_per_tick,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds elapsed since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.current_tick.0 * self.seconds_per_tick as u64
    }

    /// Seconds spanned by `ticks` ticks at this resolution.
    #[inline]
    pub fn secs_for_ticks(&self, ticks: u64) -> u64 {
        ticks * self.seconds_per_tick as u64
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.div_ceil(self.seconds_per_tick as u64)
    }

    /// Simulated hour-of-day in [0, 24), given the hour at tick 0.
    ///
    /// Drives time-of-day arrival patterns without a datetime library.
    #[inline]
    pub fn hour_of_day(&self, start_hour: u32) -> u32 {
        ((start_hour as u64 + self.elapsed_secs() / 3_600) % 24) as u32
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}s)", self.current_tick, self.elapsed_secs())
    }
}
