use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent configuration error: {0}")]
    Config(String),

    /// A parameter checkpoint could not be written or read back.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
