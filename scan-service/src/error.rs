use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{operation} is not allowed in state {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ScanResult<T> = Result<T, ScanError>;
