/// Convenience result type used across Cadenza.
pub type CadenzaResult<T> = Result<T, CadenzaError>;

/// Top-level error taxonomy used by scheduling APIs.
#[derive(thiserror::Error, Debug)]
pub enum CadenzaError {
    /// Invalid user-provided metadata or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unrecoverable lifecycle misuse surfaced by a collaborator.
    #[error("state error: {0}")]
    State(String),

    /// Failure propagated out of user-supplied routine code.
    #[error("routine error: {0}")]
    Routine(String),

    /// Failure reported by the playback collaborator.
    #[error("playback error: {0}")]
    Playback(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CadenzaError {
    /// Build a [`CadenzaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CadenzaError::State`] value.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Build a [`CadenzaError::Routine`] value.
    pub fn routine(msg: impl Into<String>) -> Self {
        Self::Routine(msg.into())
    }

    /// Build a [`CadenzaError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
