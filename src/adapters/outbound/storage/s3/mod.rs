//! S3 storage backend wiring
//!
//! Data-plane calls (get, put, delete, list, presign) go through the
//! `object_store` crate's `AmazonS3`; bucket creation goes through the AWS
//! SDK, which `object_store` does not cover.

pub mod s3_provisioner;

pub use s3_provisioner::S3BucketProvisioner;

use anyhow::{Context, Result};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use object_store::aws::{AmazonS3, AmazonS3Builder};

use crate::domain::value_objects::BucketName;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for the S3 storage backend
#[derive(Clone)]
pub struct S3Config {
    pub bucket: BucketName,
    pub region: String,
    /// Override for S3-compatible endpoints such as LocalStack or MinIO
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl S3Config {
    pub fn new(bucket: BucketName) -> Self {
        Self {
            bucket,
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    fn allows_http(&self) -> bool {
        self.endpoint
            .as_deref()
            .map_or(false, |endpoint| endpoint.starts_with("http://"))
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Create the `object_store` S3 client.
///
/// Credentials not given in `config` come from the usual `AWS_*`
/// environment variables or instance metadata.
pub fn create_s3_store(config: &S3Config) -> Result<AmazonS3> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(config.bucket.as_str())
        .with_region(&config.region);

    if let Some(access_key) = &config.access_key {
        builder = builder.with_access_key_id(access_key);
    }

    if let Some(secret_key) = &config.secret_key {
        builder = builder.with_secret_access_key(secret_key);
    }

    if let Some(endpoint) = &config.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(config.allows_http())
            .with_virtual_hosted_style_request(false);
    }

    builder.build().context("Failed to build S3 store")
}

/// Create the AWS SDK client used for bucket provisioning
pub async fn create_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "storage-service-config",
        ));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(config.endpoint.is_some())
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketName {
        BucketName::new("test-bucket".to_string()).unwrap()
    }

    #[test]
    fn test_default_region() {
        let config = S3Config::new(bucket());
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint.is_none());
        assert!(!config.allows_http());
    }

    #[test]
    fn test_local_endpoint_allows_http() {
        let config = S3Config::new(bucket()).with_endpoint("http://localhost:4566");
        assert!(config.allows_http());

        let config = S3Config::new(bucket()).with_endpoint("https://minio.internal:9000");
        assert!(!config.allows_http());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = S3Config::new(bucket()).with_credentials("test", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_store_builds_against_local_endpoint() {
        let config = S3Config::new(bucket())
            .with_region("eu-south-2")
            .with_endpoint("http://localhost:4566")
            .with_credentials("test", "test");
        assert!(create_s3_store(&config).is_ok());
    }
}
