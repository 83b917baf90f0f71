//! Geometric epsilon decay with a hard floor.

use crate::error::{AgentError, AgentResult};

/// Exploration rate as a function of the global step count:
///
///   ε(step) = max(floor, start · decayᵗ)
///
/// Monotone non-increasing and never below `floor`, for any step count.
#[derive(Copy, Clone, Debug)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub floor: f64,
    pub decay: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            floor: 0.01,
            decay: 0.995,
        }
    }
}

impl EpsilonSchedule {
    /// Schedule whose decay reaches the floor after `steps` steps.
    pub fn over_steps(steps: u64) -> Self {
        let schedule = Self::default();
        let decay = (schedule.floor / schedule.start).powf(1.0 / steps.max(1) as f64);
        Self { decay, ..schedule }
    }

    pub fn validate(&self) -> AgentResult<()> {
        if !(0.0..=1.0).contains(&self.floor)
            || !(0.0..=1.0).contains(&self.start)
            || self.floor > self.start
        {
            return Err(AgentError::Config(format!(
                "epsilon bounds [{}, {}] are malformed",
                self.floor, self.start
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(AgentError::Config(format!(
                "epsilon decay {} outside (0, 1]",
                self.decay
            )));
        }
        Ok(())
    }

    /// Exploration rate after `step` environment steps.
    pub fn value(&self, step: u64) -> f64 {
        (self.start * self.decay.powf(step as f64)).max(self.floor)
    }
}
