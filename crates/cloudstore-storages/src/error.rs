//! Error types for storage operations.

use thiserror::Error;

/// Errors returned by storage adapters.
///
/// Every error is surfaced to the caller as soon as it happens. Adapters do
/// not retry.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Adapter is misconfigured or its client handle is not available.
	#[error("Configuration error: {0}")]
	ConfigError(String),

	/// Target bucket does not exist or is not accessible.
	#[error("Bucket not found: {0}")]
	BucketNotFound(String),

	/// Target object does not exist.
	#[error("Object not found: {0}")]
	NotFound(String),

	/// Object key cannot be mapped onto the backend.
	#[error("Invalid object key: {0}")]
	InvalidKey(String),

	/// Backend rejected the request for lack of permissions.
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Network or I/O failure while streaming object data.
	#[error("Transfer error: {0}")]
	TransferError(String),

	/// A multi-step operation completed only some of its steps.
	#[error("Partial failure: {0}")]
	PartialFailure(String),

	/// Any other error reported by the backend SDK.
	#[error("Backend error: {0}")]
	BackendError(String),

	/// Local I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

impl StorageError {
	/// Returns `true` for [`StorageError::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, StorageError::NotFound(_))
	}

	/// Returns `true` for [`StorageError::BucketNotFound`].
	pub fn is_bucket_not_found(&self) -> bool {
		matches!(self, StorageError::BucketNotFound(_))
	}
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
