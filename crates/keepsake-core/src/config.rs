//! Configuration module
//!
//! Settings come from the environment (and a `.env` file when present): storage backend
//! selection, the upload bucket, the metadata database and the download link policy.

use std::env;

use chrono::Duration;

use crate::constants::{DEFAULT_LINK_RETENTION_DAYS, DEFAULT_UPLOAD_BUCKET};
use crate::storage_types::StorageBackend;

const DB_MAX_CONNECTIONS: u32 = 5;
const DB_TIMEOUT_SECS: u64 = 30;
const MAX_LINK_RETENTION_DAYS: i64 = 3650;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/storage";

/// Upload service configuration
#[derive(Clone, Debug)]
pub struct UploadServiceConfig {
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub upload_bucket: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    // Metadata database
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Download links
    pub link_retention_days: i64,
    pub public_base_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadServiceConfig>);

impl Config {
    fn inner(&self) -> &UploadServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let local_storage_path = non_empty("LOCAL_STORAGE_PATH").or_else(|| {
            (storage_backend == StorageBackend::Local)
                .then(|| DEFAULT_LOCAL_STORAGE_PATH.to_string())
        });

        let link_retention_days = match non_empty("LINK_RETENTION_DAYS") {
            Some(value) => value.trim().parse::<i64>().map_err(|e| {
                anyhow::anyhow!("LINK_RETENTION_DAYS must be an integer: {}", e)
            })?,
            None => DEFAULT_LINK_RETENTION_DAYS,
        };

        let db_max_connections = non_empty("DB_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DB_MAX_CONNECTIONS);

        let db_timeout_seconds = non_empty("DB_TIMEOUT_SECONDS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DB_TIMEOUT_SECS);

        let config = UploadServiceConfig {
            storage_backend,
            upload_bucket: non_empty("UPLOAD_BUCKET")
                .unwrap_or_else(|| DEFAULT_UPLOAD_BUCKET.to_string()),
            local_storage_path,
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            s3_region: non_empty("S3_REGION"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            aws_region: non_empty("AWS_REGION"),
            database_url: non_empty("DATABASE_URL"),
            db_max_connections,
            db_timeout_seconds,
            link_retention_days,
            public_base_url: non_empty("PUBLIC_BASE_URL"),
        };

        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let c = self.inner();

        if c.link_retention_days <= 0 || c.link_retention_days > MAX_LINK_RETENTION_DAYS {
            return Err(anyhow::anyhow!(
                "LINK_RETENTION_DAYS must be between 1 and {}",
                MAX_LINK_RETENTION_DAYS
            ));
        }

        if c.upload_bucket.contains('/') || c.upload_bucket.contains("..") {
            return Err(anyhow::anyhow!(
                "UPLOAD_BUCKET must be a single path segment"
            ));
        }

        match c.storage_backend {
            StorageBackend::S3 if c.s3_region.is_none() && c.aws_region.is_none() => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION"
                ));
            }
            StorageBackend::Local if c.local_storage_path.is_none() => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH"
                ));
            }
            _ => {}
        }

        if let Some(url) = &c.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn upload_bucket(&self) -> &str {
        &self.inner().upload_bucket
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn link_retention_days(&self) -> i64 {
        self.inner().link_retention_days
    }

    /// Download link lifetime as a duration.
    pub fn link_retention(&self) -> Duration {
        Duration::days(self.inner().link_retention_days)
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.inner().public_base_url.as_deref()
    }
}
