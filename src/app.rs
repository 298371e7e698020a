use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{ObjectStoreBackend, S3Config, DEFAULT_REGION},
    domain::value_objects::BucketName,
    ports::storage::{BucketLifecycle, StorageService},
    services::{GetItemUseCase, GetTempUrlUseCase, RemoveItemUseCase, SetItemUseCase},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory { bucket: BucketName },
    S3(S3Config),
}

impl StorageBackend {
    pub fn bucket(&self) -> &BucketName {
        match self {
            StorageBackend::InMemory { bucket } => bucket,
            StorageBackend::S3(config) => &config.bucket,
        }
    }
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<dyn StorageService>,
    pub bucket_lifecycle: Arc<dyn BucketLifecycle>,
    pub get_item: GetItemUseCase,
    pub set_item: SetItemUseCase,
    pub remove_item: RemoveItemUseCase,
    pub get_temp_url: GetTempUrlUseCase,
}

impl AppServices {
    /// Wire the use cases around a single backend
    pub fn from_backend(backend: ObjectStoreBackend) -> Self {
        let backend = Arc::new(backend);
        let storage: Arc<dyn StorageService> = backend.clone();

        Self {
            get_item: GetItemUseCase::new(storage.clone()),
            set_item: SetItemUseCase::new(storage.clone()),
            remove_item: RemoveItemUseCase::new(storage.clone()),
            get_temp_url: GetTempUrlUseCase::new(storage.clone()),
            storage,
            bucket_lifecycle: backend,
        }
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    pub fn new(storage_backend: StorageBackend) -> Self {
        Self {
            config: AppConfig { storage_backend },
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Build the storage backend for the configured provider
    pub async fn build_backend(self) -> Result<ObjectStoreBackend, AppError> {
        match self.config.storage_backend {
            StorageBackend::InMemory { bucket } => Ok(ObjectStoreBackend::in_memory(bucket)),
            StorageBackend::S3(config) => {
                ObjectStoreBackend::s3(config)
                    .await
                    .map_err(|e| AppError::StorageInit {
                        message: format!("{:#}", e),
                    })
            }
        }
    }

    /// Build the complete application with use cases
    pub async fn build(self) -> Result<AppServices, AppError> {
        let backend = self.build_backend().await?;
        Ok(AppServices::from_backend(backend))
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app(bucket: BucketName) -> Result<AppServices, AppError> {
    AppBuilder::new(StorageBackend::InMemory { bucket })
        .build()
        .await
}

/// Create an S3-backed application
pub async fn create_s3_app(config: S3Config) -> Result<AppServices, AppError> {
    AppBuilder::new(StorageBackend::S3(config)).build().await
}

/// Backend settings as read from flags or the environment, before validation.
///
/// Both `create_app_from_env` and the CLI resolve their configuration
/// through [`BackendSettings::into_config`].
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    /// `memory` (default) or `s3`
    pub kind: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BackendSettings {
    /// Read `STORAGE_BACKEND`, `S3_BUCKET`, `S3_REGION`, `S3_ENDPOINT`,
    /// `S3_ACCESS_KEY` and `S3_SECRET_KEY` through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            kind: lookup("STORAGE_BACKEND"),
            bucket: lookup("S3_BUCKET"),
            region: lookup("S3_REGION"),
            endpoint: lookup("S3_ENDPOINT"),
            access_key: lookup("S3_ACCESS_KEY"),
            secret_key: lookup("S3_SECRET_KEY"),
        }
    }

    /// Validate the settings and select the backend
    pub fn into_config(self) -> Result<AppConfig, AppError> {
        let bucket = self.bucket.ok_or_else(|| AppError::Configuration {
            message: "S3_BUCKET is required".to_string(),
        })?;
        let bucket = BucketName::new(bucket).map_err(|e| AppError::Configuration {
            message: format!("Invalid S3_BUCKET: {}", e),
        })?;

        let storage_backend = match self.kind.as_deref() {
            None | Some("memory") => StorageBackend::InMemory { bucket },
            Some("s3") => {
                let mut config = S3Config::new(bucket)
                    .with_region(self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()));
                config.endpoint = self.endpoint;
                config.access_key = self.access_key;
                config.secret_key = self.secret_key;
                StorageBackend::S3(config)
            }
            Some(other) => {
                return Err(AppError::Configuration {
                    message: format!("Unknown storage backend: {}", other),
                })
            }
        };

        Ok(AppConfig { storage_backend })
    }
}

/// Read the backend configuration from an environment lookup
pub fn config_from_lookup<F>(lookup: F) -> Result<AppConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    BackendSettings::from_lookup(lookup).into_config()
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let config = config_from_lookup(|name| std::env::var(name).ok())?;
    AppBuilder::with_config(config).build().await
}
