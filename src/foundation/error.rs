/// Convenience result type used across posterkit.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`PosterError::Validation`] and [`PosterError::Evaluation`] abort a render pass.
/// Resource, timeout and measurement errors are local: the orchestrator converts them into
/// the documented fallback and logs them.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Invalid user-provided poster data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A resource (image, font, glyph) could not be fetched or decoded.
    #[error("resource load failure: {0}")]
    Resource(String),

    /// A resource did not settle within its bounded wait.
    #[error("resource timeout: {0}")]
    Timeout(String),

    /// Text could not be measured (missing font, unsupported glyphs).
    #[error("measurement failure: {0}")]
    Measurement(String),

    /// Internal errors while compiling or executing a render plan.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PosterError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`PosterError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`PosterError::Measurement`] value.
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Build a [`PosterError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`PosterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error is a local resource condition that has a fallback policy.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Resource(_) | Self::Timeout(_) | Self::Measurement(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
