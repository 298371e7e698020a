use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use http::Method;
use object_store::{
    memory::InMemory, path::Path as ObjectPath, signer::Signer, ObjectStore as ApacheObjectStore,
    PutPayload,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{
    error::{classify, ProvisionError},
    memory_signer::InMemorySigner,
    provisioner::{BucketProvisioner, InMemoryBucketProvisioner},
    s3::{create_s3_client, create_s3_store, S3BucketProvisioner, S3Config},
};
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::{BucketName, ObjectKey, UrlExpiration},
    },
    ports::storage::{BucketLifecycle, StorageService},
};

/// Storage backend over an Apache `object_store` client.
///
/// Owns the client handles for one bucket; they are shared by clones and
/// released with the last one. Holds no per-key state.
#[derive(Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ApacheObjectStore>,
    signer: Arc<dyn Signer>,
    provisioner: Arc<dyn BucketProvisioner>,
    bucket: BucketName,
}

impl ObjectStoreBackend {
    pub fn new(
        store: Arc<dyn ApacheObjectStore>,
        signer: Arc<dyn Signer>,
        provisioner: Arc<dyn BucketProvisioner>,
        bucket: BucketName,
    ) -> Self {
        Self {
            store,
            signer,
            provisioner,
            bucket,
        }
    }

    /// Backend over process-local memory, for tests and development
    pub fn in_memory(bucket: BucketName) -> Self {
        Self::new(
            Arc::new(InMemory::new()),
            Arc::new(InMemorySigner::new(bucket.clone())),
            Arc::new(InMemoryBucketProvisioner::new()),
            bucket,
        )
    }

    /// Backend over S3 or an S3-compatible endpoint
    pub async fn s3(config: S3Config) -> anyhow::Result<Self> {
        let store = Arc::new(create_s3_store(&config)?);
        let client = create_s3_client(&config).await;
        let provisioner = Arc::new(S3BucketProvisioner::new(client, config.region.clone()));

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            "Configured S3 storage backend"
        );

        Ok(Self::new(store.clone(), store, provisioner, config.bucket))
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    /// Store path for `key`, taken verbatim so listings return the same key
    fn to_object_path(key: &ObjectKey) -> StorageResult<ObjectPath> {
        ObjectPath::parse(key.as_str())
            .map_err(|e| classify(e.into(), "resolve path", Some(key)))
    }
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("store", &self.store.to_string())
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageService for ObjectStoreBackend {
    async fn get_item(&self, key: &ObjectKey) -> StorageResult<Bytes> {
        debug!(bucket = %self.bucket, key = %key, "get item");
        let path = Self::to_object_path(key)?;

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| classify(e, "get object", Some(key)))?;

        result
            .bytes()
            .await
            .map_err(|e| classify(e, "read object body", Some(key)))
    }

    async fn set_item(&self, key: &ObjectKey, value: Bytes) -> StorageResult<()> {
        debug!(bucket = %self.bucket, key = %key, size = value.len(), "set item");
        let path = Self::to_object_path(key)?;

        self.store
            .put(&path, PutPayload::from(value))
            .await
            .map_err(|e| classify(e, "put object", Some(key)))?;

        Ok(())
    }

    async fn remove_item(&self, key: &ObjectKey) -> StorageResult<()> {
        debug!(bucket = %self.bucket, key = %key, "remove item");
        let path = Self::to_object_path(key)?;

        match self.store.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => {
                debug!(bucket = %self.bucket, key = %key, "item already absent");
                Ok(())
            }
            Err(e) => Err(classify(e, "delete object", Some(key))),
        }
    }

    async fn get_temp_url(
        &self,
        key: &ObjectKey,
        expiration_seconds: Option<u64>,
    ) -> StorageResult<String> {
        let expiration = UrlExpiration::resolve(expiration_seconds)?;
        debug!(
            bucket = %self.bucket,
            key = %key,
            expires_in = expiration.as_secs(),
            "sign temporary url"
        );
        let path = Self::to_object_path(key)?;

        let url = self
            .signer
            .signed_url(Method::GET, &path, expiration.as_duration())
            .await
            .map_err(|e| classify(e, "sign url", Some(key)))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl BucketLifecycle for ObjectStoreBackend {
    async fn ensure_bucket(&self) -> StorageResult<()> {
        if self.provisioner.bucket_exists(&self.bucket).await? {
            debug!(bucket = %self.bucket, "bucket already exists");
            return Ok(());
        }

        match self.provisioner.create_bucket(&self.bucket).await {
            Ok(()) => {
                info!(bucket = %self.bucket, "Created bucket");
                Ok(())
            }
            Err(ProvisionError::AlreadyExists(_)) => {
                warn!(bucket = %self.bucket, "Bucket was created concurrently");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn clear_bucket(&self) -> StorageResult<u64> {
        // Listing pages feed the bulk delete as they arrive
        let locations = self
            .store
            .list(None)
            .map_ok(|meta| meta.location)
            .boxed();

        let deleted = self
            .store
            .delete_stream(locations)
            .try_fold(0u64, |count, _| async move { Ok(count + 1) })
            .await
            .map_err(|e| classify(e, "clear bucket", None))?;

        info!(bucket = %self.bucket, deleted, "Cleared bucket");
        Ok(deleted)
    }

    async fn list_keys(&self, prefix: Option<&str>) -> StorageResult<Vec<ObjectKey>> {
        let prefix = prefix
            .map(ObjectPath::parse)
            .transpose()
            .map_err(|e| classify(e.into(), "list objects", None))?;

        self.store
            .list(prefix.as_ref())
            .map_err(|e| classify(e, "list objects", None))
            .and_then(|meta| async move {
                ObjectKey::new(meta.location.to_string()).map_err(StorageError::from)
            })
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ObjectStoreBackend {
        ObjectStoreBackend::in_memory(BucketName::new("test-bucket".to_string()).unwrap())
    }

    fn key(s: &str) -> ObjectKey {
        ObjectKey::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let backend = backend();
        let err = backend.get_item(&key("missing.txt")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_zero_expiration_is_invalid_argument() {
        let backend = backend();
        let err = backend
            .get_temp_url(&key("file.txt"), Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_list_keys_with_prefix() {
        let backend = backend();
        for name in ["docs/a.txt", "docs/b.txt", "images/c.png"] {
            backend
                .set_item(&key(name), Bytes::from_static(b"x"))
                .await
                .unwrap();
        }

        let mut docs = backend.list_keys(Some("docs")).await.unwrap();
        docs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(docs, vec![key("docs/a.txt"), key("docs/b.txt")]);

        assert_eq!(backend.list_keys(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let backend = backend();
        let clone = backend.clone();
        backend
            .set_item(&key("shared.txt"), Bytes::from_static(b"shared"))
            .await
            .unwrap();
        assert_eq!(
            clone.get_item(&key("shared.txt")).await.unwrap(),
            Bytes::from_static(b"shared")
        );
    }
}
