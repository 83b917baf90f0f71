//! The weighted multi-term reward calculator.

use thiserror::Error;

use crate::gini::gini;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("reward configuration error: {0}")]
    Config(String),
}

// ── Weights ───────────────────────────────────────────────────────────────────

/// Relative importance of each objective.  All weights apply to penalty
/// terms, so raising one makes the policy avoid that cost harder.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardWeights {
    pub throughput: f64,
    pub fairness: f64,
    pub safety: f64,
    pub pedestrian: f64,
    pub efficiency: f64,
    /// Flat cost per tick, keeping "do nothing forever" from scoring zero.
    pub step_penalty: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            throughput: 1.0,
            fairness: 0.5,
            safety: 100.0,
            pedestrian: 2.0,
            efficiency: 0.2,
            step_penalty: 0.1,
        }
    }
}

impl RewardWeights {
    pub fn validate(&self) -> Result<(), RewardError> {
        let named = [
            ("throughput", self.throughput),
            ("fairness", self.fairness),
            ("safety", self.safety),
            ("pedestrian", self.pedestrian),
            ("efficiency", self.efficiency),
            ("step_penalty", self.step_penalty),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(RewardError::Config(format!(
                    "weight `{name}` must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Weights plus the normalization scales that bring each raw measurement to
/// a comparable magnitude before weighting.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardConfig {
    pub weights: RewardWeights,
    /// Queue length treated as "fully congested".
    pub queue_scale: f64,
    /// Pedestrian wait-seconds per tick treated as maximal neglect.
    pub pedestrian_scale: f64,
    /// A switch away from a green younger than this is churn.
    pub churn_window_secs: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            weights: RewardWeights::default(),
            queue_scale: 50.0,
            pedestrian_scale: 10.0,
            churn_window_secs: 16,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), RewardError> {
        self.weights.validate()?;
        if self.queue_scale <= 0.0 || self.pedestrian_scale <= 0.0 {
            return Err(RewardError::Config("normalization scales must be positive".into()));
        }
        if self.churn_window_secs == 0 {
            return Err(RewardError::Config("churn window must be positive".into()));
        }
        Ok(())
    }
}

// ── Per-tick input ────────────────────────────────────────────────────────────

/// Everything the calculator reads about one completed tick.
#[derive(Clone, Debug)]
pub struct RewardInput<'a> {
    /// Entities still queued after dispatch (vehicles and pedestrians).
    pub total_queue_len: usize,
    /// Longest wait per lane, seconds, after the tick.
    pub lane_max_waits: &'a [u32],
    /// Risky events the safety layer reported this tick.
    pub risky_events: usize,
    /// Wait-seconds accrued by still-queued pedestrians this tick.
    pub pedestrian_wait_secs: u32,
    /// Did the active phase change during this tick?
    pub phase_changed: bool,
    /// Green age of the phase that was left, seconds (0 if unchanged).
    pub left_phase_after_secs: u32,
}

// ── Calculator ────────────────────────────────────────────────────────────────

/// Stateless scorer; construct once, call per tick.
pub struct RewardCalculator {
    config: RewardConfig,
}

impl RewardCalculator {
    pub fn new(config: RewardConfig) -> Result<Self, RewardError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Score one tick.  Always finite; more negative is worse.
    pub fn compute(&self, input: &RewardInput<'_>) -> f64 {
        let cfg = &self.config;
        let w = &cfg.weights;

        let throughput = input.total_queue_len as f64 / cfg.queue_scale;

        let waits: Vec<f64> = input.lane_max_waits.iter().map(|&s| s as f64).collect();
        let fairness = gini(&waits);

        let safety = input.risky_events as f64;

        let pedestrian = input.pedestrian_wait_secs as f64 / cfg.pedestrian_scale;

        let efficiency = if input.phase_changed
            && input.left_phase_after_secs < cfg.churn_window_secs
        {
            let window = cfg.churn_window_secs as f64;
            (window - input.left_phase_after_secs as f64) / window
        } else {
            0.0
        };

        -(w.throughput * throughput
            + w.fairness * fairness
            + w.safety * safety
            + w.pedestrian * pedestrian
            + w.efficiency * efficiency
            + w.step_penalty)
    }
}
