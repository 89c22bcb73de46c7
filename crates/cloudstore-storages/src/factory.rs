//! Factory function for creating storage adapters.

use crate::{CloudStorage, Result, StorageConfig};
use std::sync::Arc;

/// Create a storage adapter from configuration.
///
/// The returned adapter only exposes the common [`CloudStorage`] contract.
/// Callers that need the S3-only capabilities construct
/// `` `backends::s3::S3Storage` `` directly and use it through
/// [`ExtendedStorage`](crate::ExtendedStorage).
///
/// # Examples
///
/// ```rust,no_run
/// use cloudstore_storages::{create_storage, StorageConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StorageConfig::from_env()?;
///     let storage = create_storage(config).await?;
///     Ok(())
/// }
/// ```
pub async fn create_storage(config: StorageConfig) -> Result<Arc<dyn CloudStorage>> {
	tracing::debug!("Creating {} storage adapter", config.backend_type());

	match config {
		#[cfg(feature = "s3")]
		StorageConfig::S3(s3_config) => {
			let storage = crate::backends::s3::S3Storage::new(s3_config)?;
			Ok(Arc::new(storage))
		}
		#[cfg(feature = "gcs")]
		StorageConfig::Gcs(gcs_config) => {
			let storage = crate::backends::gcs::GcsStorage::new(gcs_config).await?;
			Ok(Arc::new(storage))
		}
		#[cfg(feature = "local")]
		StorageConfig::Local(local_config) => {
			let storage = crate::backends::local::LocalStorage::new(local_config)?;
			Ok(Arc::new(storage))
		}
	}
}
