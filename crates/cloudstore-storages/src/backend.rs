//! Storage contract definitions.

use crate::config::BackendType;
use crate::object::ObjectDescriptor;
use crate::{Result, StorageError};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

/// Common contract implemented by every backend adapter.
///
/// Callers hold adapters as `` `Arc<dyn CloudStorage>` `` and never depend
/// on the concrete backend. Every call is a single round trip to the backend
/// (or a short bounded sequence of them) and errors are returned as-is, with
/// no retry.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudstore_storages::{CloudStorage, Result};
///
/// async fn example(storage: &dyn CloudStorage) -> Result<()> {
///     storage
///         .upload(&mut &b"hello"[..], "greeting.txt", "test-bucket", "text/plain")
///         .await?;
///
///     let content = storage.read("greeting.txt", "test-bucket").await?;
///     assert_eq!(content, b"hello");
///
///     storage.delete("test-bucket", "greeting.txt").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CloudStorage: Send + Sync {
	/// Store the whole of `reader` at `(bucket, key)`.
	///
	/// Creates or overwrites the object.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::BucketNotFound` `` if the bucket does not exist.
	/// Returns `` `StorageError::TransferError` `` if reading `reader` or the
	/// network transfer fails.
	async fn upload(
		&self,
		reader: &mut (dyn AsyncRead + Send + Unpin),
		key: &str,
		bucket: &str,
		content_type: &str,
	) -> Result<()>;

	/// Fetch the full object body into memory.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::NotFound` `` if the key does not exist.
	async fn read(&self, key: &str, bucket: &str) -> Result<Vec<u8>>;

	/// Remove an object.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::NotFound` `` if the key does not exist.
	async fn delete(&self, bucket: &str, key: &str) -> Result<()>;

	/// Release the underlying client handle.
	///
	/// Idempotent. Operations invoked after `close` fail with
	/// `` `StorageError::ConfigError` ``.
	fn close(&self);

	/// The backend this adapter talks to.
	fn backend_type(&self) -> BackendType;
}

/// Operations only some backends support.
///
/// Callers that need listing or chunked downloads must depend on this trait
/// explicitly.
#[async_trait]
pub trait ExtendedStorage: CloudStorage {
	/// List objects under `prefix`.
	///
	/// Only the first page returned by the backend is read.
	async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectDescriptor>>;

	/// Download an object fully into memory.
	async fn download_to_buffer(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

	/// Stream an object into `sink` part by part. Returns the number of bytes
	/// written.
	async fn download_to_writer(
		&self,
		bucket: &str,
		key: &str,
		sink: &mut (dyn AsyncWrite + Send + Unpin),
	) -> Result<u64>;

	/// Stream an object into a local file, creating or truncating it.
	async fn download_to_path(&self, bucket: &str, key: &str, path: &Path) -> Result<u64> {
		let mut file = tokio::fs::File::create(path).await?;
		self.download_to_writer(bucket, key, &mut file).await
	}

	/// Move an object inside one bucket as copy-then-delete.
	///
	/// Not atomic; see [`MoveOutcome`].
	async fn move_within_bucket(
		&self,
		bucket: &str,
		from_key: &str,
		to_key: &str,
	) -> MoveOutcome;
}

/// Result of a non-atomic move.
#[derive(Debug)]
pub enum MoveOutcome {
	/// Object copied and source removed.
	FullySucceeded,
	/// Object copied, but removing the source failed. The object now exists
	/// at both keys.
	CopiedButDeleteFailed(StorageError),
	/// Copy failed; nothing changed.
	Failed(StorageError),
}

impl MoveOutcome {
	/// Returns `true` only when both steps succeeded.
	pub fn is_success(&self) -> bool {
		matches!(self, MoveOutcome::FullySucceeded)
	}

	/// Collapse into a plain result.
	///
	/// The partial state maps to `` `StorageError::PartialFailure` ``.
	pub fn into_result(self) -> Result<()> {
		match self {
			MoveOutcome::FullySucceeded => Ok(()),
			MoveOutcome::CopiedButDeleteFailed(error) => Err(StorageError::PartialFailure(
				format!("object copied but source not deleted: {}", error),
			)),
			MoveOutcome::Failed(error) => Err(error),
		}
	}
}

/// Read `reader` to the end.
pub(crate) async fn read_fully(reader: &mut (dyn AsyncRead + Send + Unpin)) -> Result<Vec<u8>> {
	let mut buffer = Vec::new();
	reader
		.read_to_end(&mut buffer)
		.await
		.map_err(|e| StorageError::TransferError(format!("Failed to read upload body: {}", e)))?;
	Ok(buffer)
}
