use thiserror::Error;
use tsc_reward::RewardError;
use tsc_signal::SignalError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Action index outside the 11-phase space.  Rejected at the environment
    /// boundary; the simulation state is untouched.
    #[error("invalid action index {0} (expected 0..=10)")]
    InvalidAction(u8),

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Reward(#[from] RewardError),
}

pub type SimResult<T> = Result<T, SimError>;
