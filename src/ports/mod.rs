pub mod storage;

// Re-export all port traits for convenience
pub use storage::{BucketLifecycle, StorageService};
