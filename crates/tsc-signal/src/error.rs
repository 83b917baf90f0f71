use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal configuration error: {0}")]
    Config(String),
}

pub type SignalResult<T> = Result<T, SignalError>;
