use thiserror::Error;

/// Reasons a generation call is rejected before any work is done.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid terrain configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid height map: {0}")]
    InvalidHeightMap(String),
}

impl GenerationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Errors raised while reading or writing a terrain config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read terrain config: {0}")]
    Io(#[from] std::io::Error),
    #[error("terrain config was not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("failed to parse terrain config ron: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize terrain config: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}
