//! Stochastic entity arrivals with time-of-day demand patterns.
//!
//! Each tick every approach gets an independent Bernoulli draw per entity
//! class.  Vehicle demand is scaled by a coarse hour-of-day profile (rush
//! peaks, overnight lull) and the turn split shifts toward left turns during
//! rush hours.  All draws come from one dedicated RNG stream, so arrival
//! sequences replay exactly for a given seed regardless of what the rest of
//! the simulation does.

use tsc_core::{Approach, EntityId, EntityKind, SimClock, SimRng, TurnMovement};

use crate::entity::Entity;
use crate::error::{SimError, SimResult};

// ── Turn split ────────────────────────────────────────────────────────────────

/// Probability of each movement for a newly arrived vehicle.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSplit {
    pub straight: f64,
    pub left: f64,
    pub right: f64,
}

impl TurnSplit {
    pub const OFF_PEAK: TurnSplit = TurnSplit { straight: 0.8, left: 0.1, right: 0.1 };
    pub const RUSH: TurnSplit = TurnSplit { straight: 0.7, left: 0.15, right: 0.15 };

    fn sample(&self, rng: &mut SimRng) -> TurnMovement {
        let draw: f64 = rng.gen_range(0.0..1.0);
        if draw < self.straight {
            TurnMovement::Straight
        } else if draw < self.straight + self.left {
            TurnMovement::Left
        } else {
            TurnMovement::Right
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Arrival-rate parameters, all probabilities per approach per tick.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrivalConfig {
    pub vehicle_rates: [f64; 4],
    pub pedestrian_rates: [f64; 4],
    /// Probability per tick of an emergency vehicle on a random approach.
    pub emergency_rate: f64,
    /// Hour of day at tick zero, in [0, 24).
    pub start_hour: u32,
    /// Apply the hour-of-day demand profile to vehicle rates.
    pub time_of_day: bool,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            vehicle_rates: [0.5; 4],
            pedestrian_rates: [0.2; 4],
            emergency_rate: 0.01,
            start_hour: 8,
            time_of_day: true,
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> SimResult<()> {
        let all_rates = self
            .vehicle_rates
            .iter()
            .chain(self.pedestrian_rates.iter())
            .chain(std::iter::once(&self.emergency_rate));
        for &rate in all_rates {
            if !(0.0..=1.0).contains(&rate) || !rate.is_finite() {
                return Err(SimError::Config(format!(
                    "arrival rate {rate} outside [0, 1]"
                )));
            }
        }
        if self.start_hour >= 24 {
            return Err(SimError::Config(format!(
                "start hour {} outside [0, 24)",
                self.start_hour
            )));
        }
        Ok(())
    }
}

// ── Demand profile ────────────────────────────────────────────────────────────

/// Vehicle-demand multiplier for an hour of day.
fn demand_multiplier(hour: u32) -> f64 {
    match hour {
        0..6 => 0.1,   // overnight
        6..9 => 1.5,   // morning rush
        9..15 => 0.6,  // midday
        15..18 => 1.5, // evening rush
        _ => 0.3,      // evening
    }
}

fn is_rush(hour: u32) -> bool {
    matches!(hour, 6..9 | 15..18)
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Draws this tick's arrivals.  Owns its RNG stream.
pub struct ArrivalEngine {
    config: ArrivalConfig,
    rng: SimRng,
}

impl ArrivalEngine {
    pub fn new(config: ArrivalConfig, rng: SimRng) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    #[inline]
    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    /// Generate all arrivals for the current tick, stamping them with the
    /// clock's tick and fresh IDs from `next_id`.
    pub fn tick(&mut self, clock: &SimClock, next_id: &mut EntityId) -> Vec<Entity> {
        let hour = clock.hour_of_day(self.config.start_hour);
        let multiplier = if self.config.time_of_day {
            demand_multiplier(hour)
        } else {
            1.0
        };
        let split = if self.config.time_of_day && is_rush(hour) {
            TurnSplit::RUSH
        } else {
            TurnSplit::OFF_PEAK
        };

        let mut arrivals = Vec::new();
        let now = clock.current_tick;

        for approach in Approach::ALL {
            let rate = (self.config.vehicle_rates[approach.index()] * multiplier).min(1.0);
            if self.rng.gen_bool(rate) {
                let movement = split.sample(&mut self.rng);
                arrivals.push(Entity::new(
                    next_id.take(),
                    EntityKind::Regular,
                    approach,
                    movement,
                    now,
                ));
            }
            if self.rng.gen_bool(self.config.pedestrian_rates[approach.index()]) {
                arrivals.push(Entity::new(
                    next_id.take(),
                    EntityKind::Pedestrian,
                    approach,
                    TurnMovement::Straight,
                    now,
                ));
            }
        }

        if self.rng.gen_bool(self.config.emergency_rate) {
            let approach = *self
                .rng
                .choose(&Approach::ALL)
                .expect("approach list is non-empty");
            arrivals.push(Entity::new(
                next_id.take(),
                EntityKind::Emergency,
                approach,
                TurnMovement::Straight,
                now,
            ));
        }

        arrivals
    }
}
