use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::ProvisionError;
use crate::domain::value_objects::BucketName;

/// Bucket control-plane operations a backend needs for `ensure_bucket`
#[async_trait]
pub trait BucketProvisioner: Send + Sync + 'static {
    /// Lightweight existence probe
    async fn bucket_exists(&self, bucket: &BucketName) -> Result<bool, ProvisionError>;

    /// Create the bucket.
    ///
    /// Returns `ProvisionError::AlreadyExists` when the bucket is already
    /// there, including when a concurrent caller created it first.
    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), ProvisionError>;
}

/// Provisioner for in-memory backends; tracks a single bucket's existence
#[derive(Debug, Default)]
pub struct InMemoryBucketProvisioner {
    created: AtomicBool,
}

impl InMemoryBucketProvisioner {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BucketProvisioner for InMemoryBucketProvisioner {
    async fn bucket_exists(&self, _bucket: &BucketName) -> Result<bool, ProvisionError> {
        // Stand-in for the network round trip so concurrent callers interleave
        tokio::task::yield_now().await;
        Ok(self.created.load(Ordering::Acquire))
    }

    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), ProvisionError> {
        tokio::task::yield_now().await;
        if self.created.swap(true, Ordering::AcqRel) {
            return Err(ProvisionError::AlreadyExists(bucket.to_string()));
        }
        Ok(())
    }
}
