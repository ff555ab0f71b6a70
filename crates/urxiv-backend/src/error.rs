use thiserror::Error;

/// Errors surfaced by the backend collaborator.
///
/// Backend rejections are opaque: the message is whatever the native side
/// reported. An empty result is never an error at this layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A call was attempted before the backend signalled readiness.
    #[error("Backend is not ready")]
    NotReady,

    /// The backend rejected an operation.
    #[error("{op} failed: {message}")]
    Call { op: &'static str, message: String },
}

impl BackendError {
    pub fn call(op: &'static str, message: impl Into<String>) -> Self {
        Self::Call {
            op,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackendError>;
