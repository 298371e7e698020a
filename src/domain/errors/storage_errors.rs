use crate::domain::{errors::ValidationError, value_objects::ObjectKey};

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found on read
    ObjectNotFound { key: ObjectKey },

    /// The store refused the credentials or the operation
    AccessDenied { operation: String, message: String },

    /// Malformed caller input
    InvalidArgument { message: String },

    /// Transient backend or network failure, safe to retry
    Unavailable {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },

    /// Unclassified backend failure
    Unknown {
        message: String,
        source: Option<String>,
    },
}

impl StorageError {
    /// Whether the caller may retry the same operation later
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::ObjectNotFound { .. })
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        StorageError::InvalidArgument {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::AccessDenied { operation, message } => {
                write!(f, "Access denied for operation '{}': {}", operation, message)
            }
            StorageError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            StorageError::Unavailable { message, .. } => {
                write!(f, "Storage unavailable: {}", message)
            }
            StorageError::Unknown { message, source } => match source {
                Some(source) => write!(f, "Unknown storage error: {} ({})", message, source),
                None => write!(f, "Unknown storage error: {}", message),
            },
        }
    }
}

impl std::error::Error for StorageError {}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::InvalidArgument {
            message: err.to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
