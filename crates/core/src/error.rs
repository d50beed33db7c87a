/// Result alias that carries the custom [`AudioCoreError`] type.
pub type Result<T> = std::result::Result<T, AudioCoreError>;

/// Common error type for the core crate.
///
/// Playback failures are deliberately *not* represented here: a refused or
/// failed start degrades to state plus a transient notification. `Result` is
/// reserved for contract violations such as a poisoned lock or a sink that
/// could not be constructed at all.
#[derive(Debug, thiserror::Error)]
pub enum AudioCoreError {
    #[error("{0}")]
    Message(String),
    /// Wrapper around JSON serialization errors from state snapshots.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl AudioCoreError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for AudioCoreError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AudioCoreError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
