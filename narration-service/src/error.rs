use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech platform error: {0}")]
    Platform(String),

    #[error("No narration voice available")]
    VoiceUnavailable,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type NarrationResult<T> = Result<T, NarrationError>;
