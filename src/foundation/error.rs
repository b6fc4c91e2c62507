/// Result alias used throughout the crate.
pub type StoryResult<T> = Result<T, StoryError>;

/// Crate-level error type.
#[derive(thiserror::Error, Debug)]
pub enum StoryError {
    /// Malformed request input (empty text, non-positive sizes/durations).
    #[error("validation error: {0}")]
    Validation(String),

    /// A background or audio reference could not be fetched or decoded.
    #[error("media unavailable: {0}")]
    MediaUnavailable(String),

    /// Encoding or frame production failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Any other failure with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryError {
    /// Build a [`StoryError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryError::MediaUnavailable`].
    pub fn media_unavailable(msg: impl Into<String>) -> Self {
        Self::MediaUnavailable(msg.into())
    }

    /// Build a [`StoryError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
