/// Crate-wide result alias.
pub type HeartfieldResult<T> = Result<T, HeartfieldError>;

/// Errors surfaced at the crate boundaries (config, sampling, raster, encode).
#[derive(thiserror::Error, Debug)]
pub enum HeartfieldError {
    /// Invalid configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Glyph or curve sampling failed.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sink or audio encode failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeartfieldError {
    /// Build a [`HeartfieldError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HeartfieldError::Sampling`].
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build a [`HeartfieldError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HeartfieldError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`HeartfieldError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
