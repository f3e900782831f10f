use thiserror::Error;

pub type Result<T> = std::result::Result<T, WellnessError>;

#[derive(Debug, Error)]
pub enum WellnessError {
    /// A single attempt failed on the network or with a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed after {attempts} attempts: {cause}")]
    GenerationFailure { attempts: u32, cause: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid response shape: {0}")]
    InvalidShape(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WellnessError {
    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
