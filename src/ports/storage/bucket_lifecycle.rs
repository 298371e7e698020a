use crate::domain::{errors::StorageResult, value_objects::ObjectKey};
use async_trait::async_trait;

/// Port for managing the backend's configured bucket as a whole.
/// Used by environment setup and test teardown rather than by use cases.
#[async_trait]
pub trait BucketLifecycle: Send + Sync + 'static {
    /// Create the bucket unless it already exists.
    ///
    /// Safe to call concurrently: losing a creation race counts as success.
    async fn ensure_bucket(&self) -> StorageResult<()>;

    /// Delete every object in the bucket, page by page, and return how many
    /// were removed
    async fn clear_bucket(&self) -> StorageResult<u64>;

    /// List keys under an optional path prefix
    async fn list_keys(&self, prefix: Option<&str>) -> StorageResult<Vec<ObjectKey>>;
}
