//! Object identity and metadata types.

use chrono::{DateTime, Utc};
use std::fmt;

/// A `(bucket, key)` pair identifying a stored object.
///
/// Uniqueness is enforced by the backing service, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocator {
	pub bucket: String,
	pub key: String,
}

impl ObjectLocator {
	/// Create a new locator.
	///
	/// # Examples
	///
	/// ```
	/// use cloudstore_storages::ObjectLocator;
	///
	/// let locator = ObjectLocator::new("test-bucket", "greeting.txt");
	/// assert_eq!(locator.bucket, "test-bucket");
	/// assert_eq!(locator.to_string(), "test-bucket/greeting.txt");
	/// ```
	pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
		Self {
			bucket: bucket.into(),
			key: key.into(),
		}
	}
}

impl fmt::Display for ObjectLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.bucket, self.key)
	}
}

/// Metadata attached to an object when it is uploaded.
///
/// Not mutable afterward through the storage contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
	pub content_type: String,
	pub last_modified: DateTime<Utc>,
	pub public: bool,
}

impl ObjectMetadata {
	/// Create metadata stamped with the current time.
	///
	/// # Examples
	///
	/// ```
	/// use cloudstore_storages::ObjectMetadata;
	///
	/// let metadata = ObjectMetadata::new("text/plain");
	/// assert_eq!(metadata.content_type, "text/plain");
	/// assert!(!metadata.public);
	/// ```
	pub fn new(content_type: impl Into<String>) -> Self {
		Self {
			content_type: content_type.into(),
			last_modified: Utc::now(),
			public: false,
		}
	}

	/// Mark the object as world readable.
	pub fn with_public(mut self, public: bool) -> Self {
		self.public = public;
		self
	}
}

/// One entry of an object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
	pub key: String,
	pub size: u64,
	pub last_modified: Option<DateTime<Utc>>,
	pub storage_class: Option<String>,
	pub e_tag: Option<String>,
}

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDescriptor {
	pub name: String,
	pub created_at: Option<DateTime<Utc>>,
}
