/// Convenience result type used across the filter.
pub type CrtResult<T> = Result<T, CrtError>;

/// Top-level error taxonomy used by filter APIs.
#[derive(thiserror::Error, Debug)]
pub enum CrtError {
    /// Invalid startup parameters, geometry, or mismatched frame buffers.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or parsing configuration files.
    #[error("config error: {0}")]
    Config(String),

    /// Internal failures while preparing or running the pipeline.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Unrecoverable stream IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrtError {
    /// Build a [`CrtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CrtError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CrtError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
