use crate::domain::{errors::StorageError, value_objects::ObjectKey};
use thiserror::Error as ThisError;

/// Failures of bucket control-plane calls (existence probe, creation)
#[derive(ThisError, Debug)]
pub enum ProvisionError {
    #[error("Bucket already exists: {0}")]
    AlreadyExists(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Service error: {status_code:?} - {message}")]
    Service {
        status_code: Option<u16>,
        message: String,
    },
}

impl ProvisionError {
    /// Classify a failed HTTP exchange by status code
    pub(crate) fn from_status(status_code: Option<u16>, message: String) -> Self {
        match status_code {
            Some(401) | Some(403) => ProvisionError::AccessDenied(message),
            Some(409) => ProvisionError::AlreadyExists(message),
            Some(429) | Some(500..=599) => ProvisionError::Unavailable(message),
            _ => ProvisionError::Service {
                status_code,
                message,
            },
        }
    }
}

/// Map an `object_store` failure onto the domain taxonomy.
///
/// `key` is the object the call addressed, if any; a not-found on a call
/// that addressed no object (listing, bulk delete) is not a missing item.
pub(crate) fn classify(
    err: object_store::Error,
    operation: &str,
    key: Option<&ObjectKey>,
) -> StorageError {
    match &err {
        object_store::Error::NotFound { .. } => match key {
            Some(key) => StorageError::ObjectNotFound { key: key.clone() },
            None => StorageError::Unknown {
                message: format!("Failed to {}: resource not found", operation),
                source: Some(err.to_string()),
            },
        },
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => StorageError::AccessDenied {
            operation: operation.to_string(),
            message: err.to_string(),
        },
        // The store's client has already exhausted its own retry budget on
        // transport and 5xx failures before surfacing them as Generic
        object_store::Error::Generic { .. } | object_store::Error::JoinError { .. } => {
            StorageError::Unavailable {
                message: format!("Failed to {}", operation),
                source: Some(err.to_string()),
            }
        }
        object_store::Error::InvalidPath { .. } => StorageError::InvalidArgument {
            message: err.to_string(),
        },
        _ => StorageError::Unknown {
            message: format!("Failed to {}", operation),
            source: Some(err.to_string()),
        },
    }
}

impl From<ProvisionError> for StorageError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::AccessDenied(message) => StorageError::AccessDenied {
                operation: "provision bucket".to_string(),
                message,
            },
            ProvisionError::Unavailable(message) => StorageError::Unavailable {
                message,
                source: None,
            },
            other => StorageError::Unknown {
                message: "Bucket provisioning failed".to_string(),
                source: Some(other.to_string()),
            },
        }
    }
}
