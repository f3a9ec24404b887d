use thiserror::Error;

/// Errors returned by analyzer operations.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("sample block is empty")]
    EmptyBlock,

    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(f64),

    #[error("invalid configuration: {0}")]
    Config(String),
}
