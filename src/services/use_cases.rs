//! Single-operation entry points over a [`StorageService`].
//!
//! Each use case forwards to exactly one service operation with the same
//! contract. Validation and error classification belong to the service;
//! errors are returned unchanged.

use bytes::Bytes;
use std::sync::Arc;

use crate::{
    domain::{errors::StorageResult, value_objects::ObjectKey},
    ports::storage::StorageService,
};

/// Fetch an item's full value
#[derive(Clone)]
pub struct GetItemUseCase {
    storage_service: Arc<dyn StorageService>,
}

impl GetItemUseCase {
    pub fn new(storage_service: Arc<dyn StorageService>) -> Self {
        Self { storage_service }
    }

    pub async fn execute(&self, key: &ObjectKey) -> StorageResult<Bytes> {
        self.storage_service.get_item(key).await
    }
}

/// Create or overwrite an item
#[derive(Clone)]
pub struct SetItemUseCase {
    storage_service: Arc<dyn StorageService>,
}

impl SetItemUseCase {
    pub fn new(storage_service: Arc<dyn StorageService>) -> Self {
        Self { storage_service }
    }

    pub async fn execute(&self, key: &ObjectKey, value: Bytes) -> StorageResult<()> {
        self.storage_service.set_item(key, value).await
    }
}

/// Remove an item; absent items are not an error
#[derive(Clone)]
pub struct RemoveItemUseCase {
    storage_service: Arc<dyn StorageService>,
}

impl RemoveItemUseCase {
    pub fn new(storage_service: Arc<dyn StorageService>) -> Self {
        Self { storage_service }
    }

    pub async fn execute(&self, key: &ObjectKey) -> StorageResult<()> {
        self.storage_service.remove_item(key).await
    }
}

/// Issue a temporary read URL for an item
#[derive(Clone)]
pub struct GetTempUrlUseCase {
    storage_service: Arc<dyn StorageService>,
}

impl GetTempUrlUseCase {
    pub fn new(storage_service: Arc<dyn StorageService>) -> Self {
        Self { storage_service }
    }

    /// `expiration_seconds` of `None` means the service default (one hour)
    pub async fn execute(
        &self,
        key: &ObjectKey,
        expiration_seconds: Option<u64>,
    ) -> StorageResult<String> {
        self.storage_service
            .get_temp_url(key, expiration_seconds)
            .await
    }
}
