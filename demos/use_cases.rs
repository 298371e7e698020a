use bytes::Bytes;
use std::error::Error;
use storage_service::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Use the configured backend when one is set, in-memory storage otherwise
    let services = if std::env::var("STORAGE_BACKEND").is_ok() {
        create_app_from_env().await?
    } else {
        create_in_memory_app(BucketName::new("demo-bucket".to_string())?).await?
    };

    services.bucket_lifecycle.ensure_bucket().await?;

    let key = ObjectKey::new("ejemplos/texto.txt".to_string())?;

    println!("Storing {}", key);
    services
        .set_item
        .execute(&key, Bytes::from_static(b"Hola desde el servicio de almacenamiento"))
        .await?;

    let value = services.get_item.execute(&key).await?;
    println!("Read back: {}", String::from_utf8_lossy(&value));

    let url = services.get_temp_url.execute(&key, None).await?;
    println!("Temporary URL (1 hour): {}", url);

    let short_url = services.get_temp_url.execute(&key, Some(60)).await?;
    println!("Temporary URL (60 seconds): {}", short_url);

    match services.get_temp_url.execute(&key, Some(0)).await {
        Err(e) => println!("Zero expiration rejected: {}", e),
        Ok(url) => println!("Unexpectedly signed: {}", url),
    }

    services.remove_item.execute(&key).await?;
    println!("Removed {}", key);

    match services.get_item.execute(&key).await {
        Err(e) if e.is_not_found() => println!("Read after remove: {}", e),
        Err(e) => return Err(e.into()),
        Ok(_) => println!("Object still present"),
    }

    // Removing an absent object succeeds
    services.remove_item.execute(&key).await?;
    println!("Second remove succeeded");

    Ok(())
}
