//! Local file system storage adapter.
//!
//! Buckets are directories directly under the configured root; object keys
//! are relative paths inside them. Content type and visibility are accepted
//! for contract compatibility but not persisted.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncRead;

use super::ClientHandle;
use crate::backend::read_fully;
use crate::config::{BackendType, LocalConfig};
use crate::object::{ObjectLocator, ObjectMetadata};
use crate::{CloudStorage, Result, StorageError};

/// Local file system storage adapter.
#[derive(Debug)]
pub struct LocalStorage {
	root: ClientHandle<PathBuf>,
}

impl LocalStorage {
	/// Create a new local storage adapter.
	///
	/// # Arguments
	///
	/// * `config` - Local storage configuration
	///
	/// # Errors
	///
	/// Returns `` `StorageError::ConfigError` `` if the root is not an existing
	/// directory.
	pub fn new(config: LocalConfig) -> Result<Self> {
		let root = config.root;

		if !root.exists() {
			return Err(StorageError::ConfigError(format!(
				"Root path does not exist: {}",
				root.display()
			)));
		}

		if !root.is_dir() {
			return Err(StorageError::ConfigError(format!(
				"Root path is not a directory: {}",
				root.display()
			)));
		}

		tracing::info!(root = %root.display(), "Local storage adapter ready");

		Ok(Self {
			root: ClientHandle::new("local", root),
		})
	}

	/// Resolve the bucket directory, which must already exist.
	fn bucket_path(&self, bucket: &str) -> Result<PathBuf> {
		let root = self.root.get()?;
		let path = root.join(checked_relative(bucket, bucket)?);

		if !path.is_dir() {
			return Err(StorageError::BucketNotFound(bucket.to_string()));
		}

		Ok(path)
	}

	/// Resolve the file path of an object.
	fn object_path(&self, locator: &ObjectLocator) -> Result<PathBuf> {
		let bucket = self.bucket_path(&locator.bucket)?;
		Ok(bucket.join(checked_relative(&locator.key, &locator.to_string())?))
	}
}

/// Reject names that would escape their parent directory.
fn checked_relative<'a>(name: &'a str, display: &str) -> Result<&'a Path> {
	let path = Path::new(name);
	let is_plain = !name.is_empty()
		&& path
			.components()
			.all(|component| matches!(component, Component::Normal(_)));

	if !is_plain {
		return Err(StorageError::InvalidKey(display.to_string()));
	}

	Ok(path)
}

#[async_trait]
impl CloudStorage for LocalStorage {
	async fn upload(
		&self,
		reader: &mut (dyn AsyncRead + Send + Unpin),
		key: &str,
		bucket: &str,
		content_type: &str,
	) -> Result<()> {
		let locator = ObjectLocator::new(bucket, key);
		let path = self.object_path(&locator)?;
		let metadata = ObjectMetadata::new(content_type);

		let content = read_fully(reader).await?;

		// Keys may contain slashes
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		fs::write(&path, &content).await?;

		tracing::debug!(
			object = %locator,
			bytes = content.len(),
			content_type = %metadata.content_type,
			"Uploaded object"
		);
		Ok(())
	}

	async fn read(&self, key: &str, bucket: &str) -> Result<Vec<u8>> {
		let locator = ObjectLocator::new(bucket, key);
		let path = self.object_path(&locator)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(locator.to_string()));
		}

		let content = fs::read(&path).await?;
		tracing::debug!(object = %locator, bytes = content.len(), "Read object");
		Ok(content)
	}

	async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
		let locator = ObjectLocator::new(bucket, key);
		let path = self.object_path(&locator)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(locator.to_string()));
		}

		fs::remove_file(&path).await?;
		tracing::debug!(object = %locator, "Deleted object");
		Ok(())
	}

	fn close(&self) {
		if self.root.release() {
			tracing::info!("Local storage adapter closed");
		} else {
			tracing::warn!("Local storage adapter already closed");
		}
	}

	fn backend_type(&self) -> BackendType {
		BackendType::Local
	}
}
