//! Test utility modules for storage adapter tests.
//!
//! This module provides test data generation utilities and custom assertions.

#![allow(dead_code)]
#![allow(unreachable_pub)]

use cloudstore_storages::{CloudStorage, StorageError};
use rand::Rng;
use std::fmt;

// ============================================================================
// Test Data
// ============================================================================

/// Test object structure.
#[derive(Debug, Clone)]
pub struct TestObject {
	pub key: String,
	pub content: Vec<u8>,
	pub content_type: &'static str,
}

impl TestObject {
	/// Create a new test object.
	pub fn new(key: impl Into<String>, content: Vec<u8>, content_type: &'static str) -> Self {
		Self {
			key: key.into(),
			content,
			content_type,
		}
	}

	/// Upload this object through the common contract.
	pub async fn upload_to(
		&self,
		storage: &dyn CloudStorage,
		bucket: &str,
	) -> Result<(), StorageError> {
		storage
			.upload(
				&mut self.content.as_slice(),
				&self.key,
				bucket,
				self.content_type,
			)
			.await
	}
}

/// Generate random bytes of specified size.
pub fn generate_random_bytes(size: usize) -> Vec<u8> {
	let mut bytes = vec![0u8; size];
	rand::thread_rng().fill(&mut bytes[..]);
	bytes
}

/// Generate text content with specified number of lines.
pub fn generate_text_content(lines: usize) -> String {
	(0..lines)
		.map(|i| format!("Line {}: {}", i, "test content".repeat(10)))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Generate binary content containing all byte values.
pub fn generate_binary_content() -> Vec<u8> {
	(0u8..=255).collect::<Vec<_>>()
}

/// Generate unique key with prefix.
pub fn generate_unique_key(prefix: &str) -> String {
	format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

// ============================================================================
// Custom Assertions
// ============================================================================

/// Custom assertion error.
#[derive(Debug)]
pub struct AssertionError {
	pub message: String,
}

impl fmt::Display for AssertionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for AssertionError {}

impl AssertionError {
	/// Create a new assertion error.
	pub fn new(message: String) -> Self {
		Self { message }
	}
}

/// Assert that an object reads back with the expected content.
pub async fn assert_content_matches(
	storage: &dyn CloudStorage,
	bucket: &str,
	key: &str,
	expected: &[u8],
) -> Result<(), AssertionError> {
	let actual = storage
		.read(key, bucket)
		.await
		.map_err(|e| AssertionError::new(format!("Failed to read object: {}", e)))?;

	if actual != expected {
		return Err(AssertionError::new(format!(
			"Content mismatch for {}/{} (expected {} bytes, got {} bytes)",
			bucket,
			key,
			expected.len(),
			actual.len()
		)));
	}

	Ok(())
}

/// Assert that reading an object fails with NotFound.
pub async fn assert_object_absent(
	storage: &dyn CloudStorage,
	bucket: &str,
	key: &str,
) -> Result<(), AssertionError> {
	match storage.read(key, bucket).await {
		Err(StorageError::NotFound(msg)) => {
			if msg.contains(key) {
				Ok(())
			} else {
				Err(AssertionError::new(format!(
					"NotFound error should name the key {}: {}",
					key, msg
				)))
			}
		}
		Ok(_) => Err(AssertionError::new(format!(
			"Expected {}/{} to be absent, but it was read",
			bucket, key
		))),
		Err(e) => Err(AssertionError::new(format!(
			"Expected NotFound error, got: {:?}",
			e
		))),
	}
}

/// Assert that operation returns NotFound error.
pub async fn assert_not_found<F, Fut>(f: F) -> Result<(), AssertionError>
where
	F: FnOnce() -> Fut,
	Fut: std::future::Future<Output = Result<(), StorageError>>,
{
	match f().await {
		Err(StorageError::NotFound(msg)) if !msg.is_empty() => Ok(()),
		Err(StorageError::NotFound(_)) => Err(AssertionError::new(
			"NotFound error should have a message".to_string(),
		)),
		Ok(_) => Err(AssertionError::new(
			"Expected NotFound error, but operation succeeded".to_string(),
		)),
		Err(e) => Err(AssertionError::new(format!(
			"Expected NotFound error, got: {:?}",
			e
		))),
	}
}

/// Assert that operation returns BucketNotFound error.
pub async fn assert_bucket_not_found<F, Fut>(f: F) -> Result<(), AssertionError>
where
	F: FnOnce() -> Fut,
	Fut: std::future::Future<Output = Result<(), StorageError>>,
{
	match f().await {
		Err(StorageError::BucketNotFound(_)) => Ok(()),
		Ok(_) => Err(AssertionError::new(
			"Expected BucketNotFound error, but operation succeeded".to_string(),
		)),
		Err(e) => Err(AssertionError::new(format!(
			"Expected BucketNotFound error, got: {:?}",
			e
		))),
	}
}

/// Assert that operation returns ConfigError error.
pub async fn assert_config_error<F, Fut>(f: F) -> Result<(), AssertionError>
where
	F: FnOnce() -> Fut,
	Fut: std::future::Future<Output = Result<(), StorageError>>,
{
	match f().await {
		Err(StorageError::ConfigError(msg)) if !msg.is_empty() => Ok(()),
		Err(StorageError::ConfigError(_)) => Err(AssertionError::new(
			"ConfigError should have a message".to_string(),
		)),
		Ok(_) => Err(AssertionError::new(
			"Expected ConfigError, but operation succeeded".to_string(),
		)),
		Err(e) => Err(AssertionError::new(format!(
			"Expected ConfigError, got: {:?}",
			e
		))),
	}
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_random_bytes() {
		let bytes = generate_random_bytes(100);
		assert_eq!(bytes.len(), 100);
	}

	#[test]
	fn test_generate_text_content() {
		let content = generate_text_content(5);
		let lines: Vec<&str> = content.lines().collect();
		assert_eq!(lines.len(), 5);
	}

	#[test]
	fn test_generate_binary_content() {
		let content = generate_binary_content();
		assert_eq!(content.len(), 256);
		assert_eq!(content[0], 0);
		assert_eq!(content[255], 255);
	}

	#[test]
	fn test_generate_unique_key() {
		let key1 = generate_unique_key("test");
		let key2 = generate_unique_key("test");
		assert_ne!(key1, key2);
		assert!(key1.starts_with("test-"));
	}

	#[tokio::test]
	async fn test_assert_not_found_accepts_not_found() {
		async fn returns_not_found() -> Result<(), StorageError> {
			Err(StorageError::NotFound("bucket/key".to_string()))
		}

		assert!(assert_not_found(returns_not_found).await.is_ok());
	}

	#[tokio::test]
	async fn test_assert_not_found_rejects_success() {
		async fn succeeds() -> Result<(), StorageError> {
			Ok(())
		}

		assert!(assert_not_found(succeeds).await.is_err());
	}

	#[tokio::test]
	async fn test_assert_config_error_empty_message() {
		async fn returns_empty_config_error() -> Result<(), StorageError> {
			Err(StorageError::ConfigError(String::new()))
		}

		assert!(assert_config_error(returns_empty_config_error).await.is_err());
	}

	#[tokio::test]
	async fn test_assert_bucket_not_found() {
		async fn returns_bucket_not_found() -> Result<(), StorageError> {
			Err(StorageError::BucketNotFound("missing".to_string()))
		}

		assert!(assert_bucket_not_found(returns_bucket_not_found).await.is_ok());
	}
}
