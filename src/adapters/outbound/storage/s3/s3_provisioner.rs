use async_trait::async_trait;
use aws_sdk_s3::{
    config::http::HttpResponse,
    error::{DisplayErrorContext, SdkError},
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};

use super::DEFAULT_REGION;
use crate::{
    adapters::outbound::storage::{error::ProvisionError, provisioner::BucketProvisioner},
    domain::value_objects::BucketName,
};

/// Bucket provisioning through the AWS S3 SDK
#[derive(Clone, Debug)]
pub struct S3BucketProvisioner {
    client: Client,
    region: String,
}

impl S3BucketProvisioner {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Location constraint to send with CreateBucket, if any.
    /// us-east-1 rejects an explicit constraint naming itself.
    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        if self.region == DEFAULT_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }
}

fn classify_sdk_error<E>(err: SdkError<E, HttpResponse>) -> ProvisionError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            ProvisionError::Unavailable(message)
        }
        _ => {
            let status_code = err.raw_response().map(|resp| resp.status().as_u16());
            ProvisionError::from_status(status_code, message)
        }
    }
}

#[async_trait]
impl BucketProvisioner for S3BucketProvisioner {
    async fn bucket_exists(&self, bucket: &BucketName) -> Result<bool, ProvisionError> {
        match self.client.head_bucket().bucket(bucket.as_str()).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err.as_service_error().map_or(false, |e| e.is_not_found())
                    || err.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if not_found {
                    Ok(false)
                } else {
                    Err(classify_sdk_error(err))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &BucketName) -> Result<(), ProvisionError> {
        let request = self
            .client
            .create_bucket()
            .bucket(bucket.as_str())
            .set_create_bucket_configuration(self.location_constraint());

        match request.send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let already_exists = err.as_service_error().map_or(false, |e| {
                    e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists()
                });
                if already_exists {
                    Err(ProvisionError::AlreadyExists(bucket.to_string()))
                } else {
                    Err(classify_sdk_error(err))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Region};

    fn provisioner(region: &str) -> S3BucketProvisioner {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .build();
        S3BucketProvisioner::new(Client::from_conf(config), region)
    }

    #[test]
    fn test_no_location_constraint_in_default_region() {
        assert!(provisioner("us-east-1").location_constraint().is_none());
    }

    #[test]
    fn test_location_constraint_names_region() {
        let config = provisioner("eu-south-2").location_constraint().unwrap();
        assert_eq!(
            config.location_constraint().map(|c| c.as_str()),
            Some("eu-south-2")
        );
    }
}
