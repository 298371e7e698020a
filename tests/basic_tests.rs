use bytes::Bytes;
use chrono::Utc;
use futures::future::join_all;
use http::Method;
use object_store::memory::InMemory;
use std::sync::Arc;
use storage_service::{
    adapters::outbound::storage::{InMemoryBucketProvisioner, InMemorySigner},
    create_in_memory_app, BucketLifecycle, BucketName, ObjectKey, ObjectStoreBackend,
    StorageError, StorageService,
};
use url::Url;

fn bucket() -> BucketName {
    BucketName::new("test-bucket".to_string()).unwrap()
}

fn key(s: &str) -> ObjectKey {
    ObjectKey::new(s.to_string()).unwrap()
}

/// In-memory backend whose signer stays reachable for URL verification
fn backend_with_signer() -> (ObjectStoreBackend, Arc<InMemorySigner>) {
    let signer = Arc::new(InMemorySigner::new(bucket()));
    let backend = ObjectStoreBackend::new(
        Arc::new(InMemory::new()),
        signer.clone(),
        Arc::new(InMemoryBucketProvisioner::new()),
        bucket(),
    );
    (backend, signer)
}

#[tokio::test]
async fn basic_set_get() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("test.txt");
    let data = Bytes::from("hello world");

    services.set_item.execute(&key, data.clone()).await.unwrap();

    let result = services.get_item.execute(&key).await.unwrap();
    assert_eq!(result, data);
}

#[tokio::test]
async fn set_overwrites_existing_value() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("config/settings.json");

    services
        .set_item
        .execute(&key, Bytes::from("first"))
        .await
        .unwrap();
    services
        .set_item
        .execute(&key, Bytes::from("second"))
        .await
        .unwrap();

    let result = services.get_item.execute(&key).await.unwrap();
    assert_eq!(result, Bytes::from("second"));
}

#[tokio::test]
async fn empty_value_round_trips() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("empty.bin");

    services.set_item.execute(&key, Bytes::new()).await.unwrap();
    assert!(services.get_item.execute(&key).await.unwrap().is_empty());
}

#[tokio::test]
async fn basic_remove() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("to_delete.txt");

    services
        .set_item
        .execute(&key, Bytes::from("delete me"))
        .await
        .unwrap();
    services.remove_item.execute(&key).await.unwrap();

    let err = services.get_item.execute(&key).await.unwrap_err();
    match err {
        StorageError::ObjectNotFound { key: missing } => {
            assert_eq!(missing.as_str(), "to_delete.txt")
        }
        other => panic!("Expected ObjectNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn listed_keys_read_back_verbatim() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("drafts/report~v1#draft [final]*?.txt");

    services
        .set_item
        .execute(&key, Bytes::from("draft"))
        .await
        .unwrap();

    let listed = services.bucket_lifecycle.list_keys(None).await.unwrap();
    assert_eq!(listed, vec![key.clone()]);
    assert_eq!(
        services.get_item.execute(&listed[0]).await.unwrap(),
        Bytes::from("draft")
    );

    let under_prefix = services
        .bucket_lifecycle
        .list_keys(Some("drafts"))
        .await
        .unwrap();
    assert_eq!(under_prefix, vec![key.clone()]);

    services.remove_item.execute(&listed[0]).await.unwrap();
    assert!(services.get_item.execute(&key).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn temp_url_names_the_key_verbatim() {
    let (backend, signer) = backend_with_signer();
    let key = key("report~v1#draft.txt");

    let url = backend.get_temp_url(&key, None).await.unwrap();
    let url = Url::parse(&url).unwrap();

    assert_eq!(
        urlencoding::decode(url.path()).unwrap(),
        "/report~v1#draft.txt"
    );
    assert!(signer.verify(&Method::GET, &url, Utc::now()));
}

#[tokio::test]
async fn remove_is_idempotent() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("never-written.txt");

    services.remove_item.execute(&key).await.unwrap();
    services.remove_item.execute(&key).await.unwrap();
}

#[tokio::test]
async fn temp_url_defaults_to_one_hour() {
    let (backend, signer) = backend_with_signer();
    let key = key("docs/annual report.pdf");

    let url = backend.get_temp_url(&key, None).await.unwrap();
    let url = Url::parse(&url).unwrap();

    assert_eq!(
        urlencoding::decode(url.path()).unwrap(),
        "/docs/annual report.pdf"
    );
    assert!(url
        .query_pairs()
        .any(|(name, value)| name == "X-Amz-Expires" && value == "3600"));
    assert!(signer.verify(&Method::GET, &url, Utc::now()));
}

#[tokio::test]
async fn temp_url_honours_custom_expiration() {
    let (backend, signer) = backend_with_signer();

    let url = backend.get_temp_url(&key("a.txt"), Some(60)).await.unwrap();
    let url = Url::parse(&url).unwrap();

    assert!(url
        .query_pairs()
        .any(|(name, value)| name == "X-Amz-Expires" && value == "60"));
    assert!(signer.verify(&Method::GET, &url, Utc::now()));
    assert!(!signer.verify(
        &Method::GET,
        &url,
        Utc::now() + chrono::Duration::seconds(61)
    ));
}

#[tokio::test]
async fn temp_url_does_not_require_the_object() {
    let services = create_in_memory_app(bucket()).await.unwrap();

    let url = services
        .get_temp_url
        .execute(&key("not/yet/uploaded.txt"), None)
        .await
        .unwrap();
    assert!(url.starts_with("memory://test-bucket/not/yet/uploaded.txt?"));
}

#[tokio::test]
async fn temp_url_rejects_invalid_expiration() {
    let services = create_in_memory_app(bucket()).await.unwrap();
    let key = key("a.txt");

    for expiration in [0, 604_801] {
        let err = services
            .get_temp_url
            .execute(&key, Some(expiration))
            .await
            .unwrap_err();
        assert!(
            matches!(err, StorageError::InvalidArgument { .. }),
            "expiration {} gave {:?}",
            expiration,
            err
        );
    }
}

#[tokio::test]
async fn ensure_bucket_is_idempotent() {
    let services = create_in_memory_app(bucket()).await.unwrap();

    services.bucket_lifecycle.ensure_bucket().await.unwrap();
    services.bucket_lifecycle.ensure_bucket().await.unwrap();
}

#[tokio::test]
async fn concurrent_ensure_bucket_all_succeed() {
    let services = create_in_memory_app(bucket()).await.unwrap();

    let results = join_all((0..8).map(|_| {
        let lifecycle = services.bucket_lifecycle.clone();
        async move { lifecycle.ensure_bucket().await }
    }))
    .await;

    for result in results {
        result.unwrap();
    }
}

#[tokio::test]
async fn clear_empty_bucket() {
    let services = create_in_memory_app(bucket()).await.unwrap();

    let deleted = services.bucket_lifecycle.clear_bucket().await.unwrap();
    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn clear_bucket_removes_every_object() {
    let services = create_in_memory_app(bucket()).await.unwrap();

    for i in 0..1500 {
        services
            .set_item
            .execute(&key(&format!("batch/{:04}.txt", i)), Bytes::from("x"))
            .await
            .unwrap();
    }
    services
        .set_item
        .execute(&key("top-level.txt"), Bytes::from("y"))
        .await
        .unwrap();

    let deleted = services.bucket_lifecycle.clear_bucket().await.unwrap();
    assert_eq!(deleted, 1501);
    assert!(services
        .bucket_lifecycle
        .list_keys(None)
        .await
        .unwrap()
        .is_empty());

    // The bucket stays usable
    services
        .set_item
        .execute(&key("after.txt"), Bytes::from("z"))
        .await
        .unwrap();
    assert_eq!(services.bucket_lifecycle.clear_bucket().await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_keys_are_rejected_before_storage() {
    for bad in ["", "/leading", "a//b", "trailing/", "a/../b"] {
        assert!(
            ObjectKey::new(bad.to_string()).is_err(),
            "{:?} should be rejected",
            bad
        );
    }
}
