use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use hmac::{Hmac, Mac};
use http::Method;
use object_store::{path::Path as ObjectPath, signer::Signer};
use sha2::Sha256;
use std::time::Duration;
use url::Url;

use crate::domain::value_objects::BucketName;

type HmacSha256 = Hmac<Sha256>;

const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const STORE_NAME: &str = "InMemorySigner";

/// Signs `memory://` URLs for the in-memory backend.
///
/// URLs carry the same query parameters as a SigV4 presigned URL
/// (`X-Amz-Date`, `X-Amz-Expires`, `X-Amz-Signature`) and are signed with a
/// per-instance secret, so only the signer that issued a URL can verify it.
pub struct InMemorySigner {
    bucket: BucketName,
    secret: Vec<u8>,
}

impl InMemorySigner {
    pub fn new(bucket: BucketName) -> Self {
        let mut secret = uuid::Uuid::new_v4().as_bytes().to_vec();
        secret.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        Self { bucket, secret }
    }

    fn mac(&self, method: &Method, url_path: &str, date: &str, expires: u64) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(format!("{}\n{}\n{}\n{}", method, url_path, date, expires).as_bytes());
        Some(mac)
    }

    /// Check that `url` was issued by this signer for `method` and is still
    /// valid at `now`
    pub fn verify(&self, method: &Method, url: &Url, now: DateTime<Utc>) -> bool {
        if url.scheme() != "memory" || url.host_str() != Some(self.bucket.as_str()) {
            return false;
        }

        let mut date = None;
        let mut expires = None;
        let mut signature = None;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "X-Amz-Date" => date = Some(value.into_owned()),
                "X-Amz-Expires" => expires = value.parse::<u64>().ok(),
                "X-Amz-Signature" => signature = hex::decode(value.as_bytes()).ok(),
                _ => {}
            }
        }
        let (Some(date), Some(expires), Some(signature)) = (date, expires, signature) else {
            return false;
        };

        let Ok(issued_at) = NaiveDateTime::parse_from_str(&date, DATE_FORMAT) else {
            return false;
        };
        let Ok(window) = chrono::Duration::from_std(Duration::from_secs(expires)) else {
            return false;
        };
        if now > issued_at.and_utc() + window {
            return false;
        }

        self.mac(method, url.path(), &date, expires)
            .map_or(false, |mac| mac.verify_slice(&signature).is_ok())
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for InMemorySigner {
    async fn signed_url(
        &self,
        method: Method,
        path: &ObjectPath,
        expires_in: Duration,
    ) -> object_store::Result<Url> {
        let mut url = Url::parse(&format!("memory://{}/", self.bucket)).map_err(|e| {
            object_store::Error::Generic {
                store: STORE_NAME,
                source: Box::new(e),
            }
        })?;
        url.set_path(path.as_ref());

        let date = Utc::now().format(DATE_FORMAT).to_string();
        let expires = expires_in.as_secs();
        let mac = self.mac(&method, url.path(), &date, expires).ok_or_else(|| {
            object_store::Error::Generic {
                store: STORE_NAME,
                source: "signing key rejected".into(),
            }
        })?;
        let signature = hex::encode(mac.finalize().into_bytes());

        url.query_pairs_mut()
            .append_pair("X-Amz-Date", &date)
            .append_pair("X-Amz-Expires", &expires.to_string())
            .append_pair("X-Amz-Signature", &signature);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> InMemorySigner {
        InMemorySigner::new(BucketName::new("test-bucket".to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_signed_url_shape() {
        let url = signer()
            .signed_url(
                Method::GET,
                &ObjectPath::from("ejemplos/texto.txt"),
                Duration::from_secs(300),
            )
            .await
            .unwrap();

        assert_eq!(url.scheme(), "memory");
        assert_eq!(url.host_str(), Some("test-bucket"));
        assert_eq!(url.path(), "/ejemplos/texto.txt");
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "X-Amz-Expires" && v == "300"));
    }

    #[tokio::test]
    async fn test_verify_accepts_own_url_within_window() {
        let signer = signer();
        let url = signer
            .signed_url(Method::GET, &ObjectPath::from("a/b"), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(signer.verify(&Method::GET, &url, Utc::now()));
        assert!(!signer.verify(&Method::PUT, &url, Utc::now()));
        assert!(!signer.verify(
            &Method::GET,
            &url,
            Utc::now() + chrono::Duration::seconds(120)
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_tampering_and_foreign_signer() {
        let signer = signer();
        let url = signer
            .signed_url(Method::GET, &ObjectPath::from("a/b"), Duration::from_secs(60))
            .await
            .unwrap();

        let mut tampered = url.clone();
        tampered.set_path("/a/c");
        assert!(!signer.verify(&Method::GET, &tampered, Utc::now()));

        let other = InMemorySigner::new(BucketName::new("test-bucket".to_string()).unwrap());
        assert!(!other.verify(&Method::GET, &url, Utc::now()));
    }
}
