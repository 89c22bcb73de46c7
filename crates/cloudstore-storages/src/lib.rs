//! # cloudstore-storages
//!
//! Object storage abstraction over Amazon S3 and Google Cloud Storage.
//!
//! This crate exposes a small common contract, [`CloudStorage`], that every
//! backend adapter implements (upload, read, delete, close), plus an
//! [`ExtendedStorage`] capability that only the S3 adapter provides (listing,
//! chunked downloads, move within a bucket).
//!
//! ## Features
//!
//! - **Thin adapters**: every operation is a direct call into the vendor SDK
//! - **Explicit configuration**: adapters are built from config values, never
//!   from the process environment
//! - **Feature Flags**: `s3`, `gcs` and `local` enable the matching backends
//!
//! ## Example
//!
//! ```rust,no_run
//! use cloudstore_storages::{CloudStorage, StorageConfig, create_storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Resolve configuration from the environment on the caller side
//!     let config = StorageConfig::from_env()?;
//!     let storage = create_storage(config).await?;
//!
//!     storage
//!         .upload(&mut &b"hello"[..], "greeting.txt", "test-bucket", "text/plain")
//!         .await?;
//!     let content = storage.read("greeting.txt", "test-bucket").await?;
//!     assert_eq!(content, b"hello");
//!
//!     storage.delete("test-bucket", "greeting.txt").await?;
//!     storage.close();
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod object;

pub use backend::{CloudStorage, ExtendedStorage, MoveOutcome};
pub use config::{BackendType, StorageConfig};
pub use error::{Result, StorageError};
pub use factory::create_storage;
pub use object::{BucketDescriptor, ObjectDescriptor, ObjectLocator, ObjectMetadata};
