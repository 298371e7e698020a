pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects and errors
pub use domain::{
    BucketName, ObjectKey, StorageError, StorageResult, UrlExpiration, ValidationError,
};

// Port types - interfaces for storage backends
pub use ports::{BucketLifecycle, StorageService};

// Use cases - one per storage operation
pub use services::{GetItemUseCase, GetTempUrlUseCase, RemoveItemUseCase, SetItemUseCase};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, create_s3_app, AppBuilder, AppConfig, AppError,
    AppServices, BackendSettings, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    InMemorySigner, ObjectStoreBackend, ProvisionError, S3Config, DEFAULT_REGION,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_app_from_env, create_in_memory_app, create_s3_app, AppBuilder, AppServices,
        BucketLifecycle, BucketName, ObjectKey, ObjectStoreBackend, S3Config, StorageError,
        StorageResult, StorageService,
    };
}
