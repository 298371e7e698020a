use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use storage_service::{
    app::{AppBuilder, AppConfig, BackendSettings},
    AppServices, ObjectKey,
};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "storectl")]
#[command(about = "Read, write and manage objects in a storage bucket", long_about = None)]
struct Cli {
    /// Storage backend type (memory or s3)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Bucket name
    #[arg(short, long, env = "S3_BUCKET")]
    bucket: String,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = storage_service::DEFAULT_REGION)]
    s3_region: String,

    /// Endpoint override for S3-compatible services
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY", hide_env_values = true)]
    s3_secret_key: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download an object
    Get {
        /// Object key
        key: String,
        /// Output file path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a file as an object, replacing any existing value
    Set {
        /// Object key
        key: String,
        /// File path to upload
        file: PathBuf,
    },

    /// Delete an object
    Remove {
        /// Object key
        key: String,
    },

    /// Print a temporary download URL for an object
    TempUrl {
        /// Object key
        key: String,
        /// Validity in seconds (default 3600)
        #[arg(short, long)]
        expires: Option<u64>,
    },

    /// Create the bucket if it does not exist
    EnsureBucket,

    /// Delete every object in the bucket
    ClearBucket,

    /// List object keys
    List {
        /// Prefix to filter objects
        #[arg(short, long)]
        prefix: Option<String>,
    },
}

impl Cli {
    fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            kind: Some(self.storage_backend.clone()),
            bucket: Some(self.bucket.clone()),
            region: Some(self.s3_region.clone()),
            endpoint: self.s3_endpoint.clone(),
            access_key: self.s3_access_key.clone(),
            secret_key: self.s3_secret_key.clone(),
        }
    }

    fn to_app_config(&self) -> Result<AppConfig> {
        Ok(self.backend_settings().into_config()?)
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_new(self.log_level.to_lowercase())
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        Ok(())
    }
}

fn parse_key(key: &str) -> Result<ObjectKey> {
    ObjectKey::new(key.to_string()).with_context(|| format!("Invalid object key: {}", key))
}

async fn run(command: Commands, app: &AppServices) -> Result<()> {
    match command {
        Commands::Get { key, output } => {
            let key = parse_key(&key)?;
            let value = app
                .get_item
                .execute(&key)
                .await
                .with_context(|| format!("Failed to get {}", key))?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &value)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(key = %key, path = %path.display(), size = value.len(), "Downloaded object");
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&value).await?;
                    stdout.flush().await?;
                }
            }
        }
        Commands::Set { key, file } => {
            let key = parse_key(&key)?;
            let value = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let size = value.len();

            app.set_item
                .execute(&key, Bytes::from(value))
                .await
                .with_context(|| format!("Failed to set {}", key))?;
            println!("Stored {} ({} bytes)", key, size);
        }
        Commands::Remove { key } => {
            let key = parse_key(&key)?;
            app.remove_item
                .execute(&key)
                .await
                .with_context(|| format!("Failed to remove {}", key))?;
            println!("Removed {}", key);
        }
        Commands::TempUrl { key, expires } => {
            let key = parse_key(&key)?;
            let url = app
                .get_temp_url
                .execute(&key, expires)
                .await
                .with_context(|| format!("Failed to sign URL for {}", key))?;
            println!("{}", url);
        }
        Commands::EnsureBucket => {
            app.bucket_lifecycle
                .ensure_bucket()
                .await
                .context("Failed to ensure bucket")?;
            println!("Bucket ready");
        }
        Commands::ClearBucket => {
            let deleted = app
                .bucket_lifecycle
                .clear_bucket()
                .await
                .context("Failed to clear bucket")?;
            println!("Deleted {} objects", deleted);
        }
        Commands::List { prefix } => {
            let keys = app
                .bucket_lifecycle
                .list_keys(prefix.as_deref())
                .await
                .context("Failed to list objects")?;
            for key in keys {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    let config = cli.to_app_config()?;
    info!(
        backend = %cli.storage_backend,
        bucket = %config.storage_backend.bucket(),
        "Starting storectl"
    );

    let app = AppBuilder::with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    run(cli.command, &app).await
}
