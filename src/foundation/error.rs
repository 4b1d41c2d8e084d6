/// Convenience result type used across Sitelapse.
pub type SitelapseResult<T> = Result<T, SitelapseError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SitelapseError {
    /// Invalid user-provided or schedule data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The visualization window is unset or unresolvable.
    #[error("window error: {0}")]
    Window(String),

    /// Invalid appearance profile or profile-group operation.
    #[error("profile error: {0}")]
    Profile(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SitelapseError {
    /// Build a [`SitelapseError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SitelapseError::Window`] value.
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }

    /// Build a [`SitelapseError::Profile`] value.
    pub fn profile(msg: impl Into<String>) -> Self {
        Self::Profile(msg.into())
    }

    /// Build a [`SitelapseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
