use thiserror::Error;
use tsc_agent::AgentError;
use tsc_sim::SimError;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("trainer configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("metrics output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TrainResult<T> = Result<T, TrainError>;
