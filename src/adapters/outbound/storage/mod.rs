// Infrastructure error types
pub mod error;

// Storage implementations
pub mod memory_signer;
pub mod object_store_backend;
pub mod provisioner;

// Provider-specific implementations
pub mod s3;

// Re-export key types
pub use error::ProvisionError;
pub use memory_signer::InMemorySigner;
pub use object_store_backend::ObjectStoreBackend;
pub use provisioner::{BucketProvisioner, InMemoryBucketProvisioner};
pub use s3::{S3BucketProvisioner, S3Config, DEFAULT_REGION};
