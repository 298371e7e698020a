use crate::domain::{errors::StorageResult, value_objects::ObjectKey};
use async_trait::async_trait;
use bytes::Bytes;

/// Port for item storage operations
/// This abstracts the actual storage backend (S3, in-memory, etc.)
///
/// Every operation is a single awaitable unit of work with no internal
/// retry; callers decide whether to retry based on
/// [`StorageError::is_retryable`](crate::domain::StorageError::is_retryable).
#[async_trait]
pub trait StorageService: Send + Sync + 'static {
    /// Fetch the full current value of `key`.
    ///
    /// Fails with `ObjectNotFound` when the key was never written or has
    /// been removed.
    async fn get_item(&self, key: &ObjectKey) -> StorageResult<Bytes>;

    /// Create `key`, or overwrite it when it already exists
    async fn set_item(&self, key: &ObjectKey, value: Bytes) -> StorageResult<()>;

    /// Delete `key`; succeeds when the key is already absent
    async fn remove_item(&self, key: &ObjectKey) -> StorageResult<()>;

    /// Signed URL granting anonymous GET of `key` for `expiration_seconds`
    /// (3600 when `None`).
    ///
    /// The URL is computed locally and does not check that the key exists.
    async fn get_temp_url(
        &self,
        key: &ObjectKey,
        expiration_seconds: Option<u64>,
    ) -> StorageResult<String>;
}
