/// Result alias used at the configuration and CLI boundaries.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while building or validating loader configuration.
///
/// Rendering itself never fails: the animator is a passive indicator and degrades to drawing
/// nothing instead of reporting errors.
#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    /// An option value is outside its documented domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// A color literal could not be parsed.
    #[error("color error: {0}")]
    Color(String),

    /// Options JSON could not be decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually IO from a host.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoaderError {
    /// Build a [`LoaderError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoaderError::Color`].
    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }

    /// Build a [`LoaderError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}
