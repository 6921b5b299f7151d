//! Keepsake Storage Library
//!
//! This crate provides the blob store abstraction and its implementations: the `Storage`
//! trait, a local filesystem backend and an S3-compatible backend.
//!
//! # Storage path format
//!
//! Uploaded media lands at `{bucket}/{YYYY-MM-DD}/{suffix}.{ext}`, where the date is the
//! commit's context date and the suffix is generated per file. Paths must not contain `..`
//! or a leading `/`. Path generation is centralized in the `keys` module so all backends
//! and callers agree on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keepsake_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
