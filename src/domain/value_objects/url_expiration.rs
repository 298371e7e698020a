use std::time::Duration;

use crate::domain::errors::ValidationError;

/// Validity window of a temporary URL, fixed when the URL is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlExpiration(u64);

impl UrlExpiration {
    /// Window applied when the caller does not supply one
    pub const DEFAULT_SECS: u64 = 3600;

    /// Longest window a SigV4 presigned URL accepts (7 days)
    pub const MAX_SECS: u64 = 7 * 24 * 3600;

    pub fn from_secs(secs: u64) -> Result<Self, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::ExpirationNotPositive);
        }
        if secs > Self::MAX_SECS {
            return Err(ValidationError::ExpirationTooLong {
                actual: secs,
                max: Self::MAX_SECS,
            });
        }
        Ok(Self(secs))
    }

    /// Resolve an optional caller-supplied window, falling back to the default
    pub fn resolve(secs: Option<u64>) -> Result<Self, ValidationError> {
        Self::from_secs(secs.unwrap_or(Self::DEFAULT_SECS))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for UrlExpiration {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}
