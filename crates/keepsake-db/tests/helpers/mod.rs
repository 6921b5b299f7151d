//! Test helpers: a throwaway Postgres container with the uploads schema applied.
//!
//! Migrations path: from keepsake-db crate root, `../../migrations`.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use keepsake_core::{Config, DownloadLinkRecord, FileCandidate, StagedFile, UploadMetadataRecord};
use keepsake_db::setup_database;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

/// Migrated database plus the container that backs it.
pub struct TestDb {
    pub pool: PgPool,
    pub database_url: String,
    pub _container: ContainerAsync<Postgres>,
}

/// Start Postgres and run the workspace migrations through `setup_database`.
pub async fn setup_test_db() -> TestDb {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start Postgres container");
    let host = container.get_host().await.expect("Container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Container port");

    let database_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        "DB_MAX_CONNECTIONS" => Some("2".to_string()),
        _ => None,
    })
    .expect("Failed to build test config");

    let pool = setup_database(&config)
        .await
        .expect("Failed to set up test database");

    TestDb {
        pool,
        database_url,
        _container: container,
    }
}

pub fn wedding_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 20, 14, 0, 0).unwrap()
}

pub fn upload_record(name: &str, mime_type: &str, size: usize, path: &str) -> UploadMetadataRecord {
    let staged = StagedFile::from_candidate(FileCandidate::new(name, mime_type, vec![0u8; size]));
    UploadMetadataRecord::for_staged(&staged, path)
}

pub fn link(token: &str) -> DownloadLinkRecord {
    DownloadLinkRecord::issue(token, wedding_day(), chrono::Duration::days(7)).unwrap()
}
