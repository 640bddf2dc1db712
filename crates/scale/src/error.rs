use thiserror::Error;

/// Errors surfaced by the scaling engine. All of them are fatal for the
/// profile being processed; discovery-internal load failures are logged and
/// skipped instead of being raised through this type.
#[derive(Debug, Clone, Error)]
pub enum ScaleError {
    /// A profile failed validation while building a strategy config. Never
    /// silently defaulted; no partially valid config exists after this.
    #[error("invalid scaling config: {0}")]
    Config(String),

    #[error("plugin '{0}' not found")]
    UnknownPlugin(String),

    #[error("plugin '{name}' version '{version}' not found")]
    UnknownVersion { name: String, version: String },
}

impl ScaleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ScaleError::Config(message.into())
    }
}
