use serde::Serialize;

/// All errors that can surface from the membership session core.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored membership data is malformed: {0}")]
    MalformedSession(#[from] serde_json::Error),

    #[error("Local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Submission was cancelled")]
    Cancelled,

    #[error("{0}")]
    Custom(String),
}

// Tauri requires error types to implement Serialize for IPC transport.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
