mod bucket_lifecycle;
mod storage_service;

pub use bucket_lifecycle::BucketLifecycle;
pub use storage_service::StorageService;
