//! Configuration types for storage backends.
//!
//! Adapters only ever receive these values explicitly. Resolving them from
//! the process environment is left to the caller through
//! [`StorageConfig::from_env`].

use crate::{Result, StorageError};
use std::env;
use std::str::FromStr;
#[cfg(any(feature = "gcs", feature = "local"))]
use std::path::PathBuf;
#[cfg(feature = "s3")]
use std::time::Duration;

/// Default part size for chunked S3 downloads (256 MiB).
pub const DEFAULT_DOWNLOAD_PART_SIZE: u64 = 256 * 1024 * 1024;

/// Default upper bound on the wait for an S3 delete to take effect.
///
/// Matches the classic SDK waiter policy of 20 attempts, 5 seconds apart.
#[cfg(feature = "s3")]
pub const DEFAULT_DELETE_WAIT: Duration = Duration::from_secs(100);

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
	/// Amazon S3 storage
	S3,
	/// Google Cloud Storage
	Gcs,
	/// Local file system
	Local,
}

impl std::fmt::Display for BackendType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BackendType::S3 => write!(f, "S3"),
			BackendType::Gcs => write!(f, "GCS"),
			BackendType::Local => write!(f, "Local"),
		}
	}
}

impl FromStr for BackendType {
	type Err = StorageError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"s3" => Ok(BackendType::S3),
			"gcs" => Ok(BackendType::Gcs),
			"local" => Ok(BackendType::Local),
			_ => Err(StorageError::ConfigError(format!(
				"Invalid backend type: {}",
				s
			))),
		}
	}
}

/// Configuration for the S3 adapter.
#[cfg(feature = "s3")]
#[derive(Clone)]
pub struct S3Config {
	/// AWS region (e.g., "us-east-1")
	pub region: String,
	/// Access key id
	pub access_key_id: String,
	/// Secret access key
	pub secret_access_key: String,
	/// Session token for temporary credentials
	pub session_token: Option<String>,
	/// Custom endpoint URL (for LocalStack or MinIO)
	pub endpoint: Option<String>,
	/// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
	pub force_path_style: bool,
	/// Upper bound on the post-delete existence poll
	pub delete_wait: Duration,
	/// Byte size of each ranged GET in chunked downloads
	pub download_part_size: u64,
}

#[cfg(feature = "s3")]
impl S3Config {
	/// Create a configuration with static credentials.
	///
	/// # Examples
	///
	/// ```
	/// use cloudstore_storages::config::S3Config;
	///
	/// let config = S3Config::new("us-east-1", "AKIDEXAMPLE", "secret")
	///     .with_endpoint("http://localhost:4566");
	/// assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
	/// assert!(config.force_path_style);
	/// ```
	pub fn new(
		region: impl Into<String>,
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
	) -> Self {
		Self {
			region: region.into(),
			access_key_id: access_key_id.into(),
			secret_access_key: secret_access_key.into(),
			session_token: None,
			endpoint: None,
			force_path_style: false,
			delete_wait: DEFAULT_DELETE_WAIT,
			download_part_size: DEFAULT_DOWNLOAD_PART_SIZE,
		}
	}

	/// Set the session token for temporary credentials.
	pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
		self.session_token = Some(token.into());
		self
	}

	/// Point the client at a custom endpoint. Enables path-style addressing,
	/// which S3-compatible servers expect.
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
		self.force_path_style = true;
		self
	}

	/// Set the upper bound on the post-delete wait.
	pub fn with_delete_wait(mut self, wait: Duration) -> Self {
		self.delete_wait = wait;
		self
	}

	/// Set the chunk size for chunked downloads. Zero is clamped to one byte.
	pub fn with_download_part_size(mut self, part_size: u64) -> Self {
		self.download_part_size = part_size.max(1);
		self
	}
}

#[cfg(feature = "s3")]
impl std::fmt::Debug for S3Config {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("S3Config")
			.field("region", &self.region)
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"***")
			.field("session_token", &self.session_token.as_ref().map(|_| "***"))
			.field("endpoint", &self.endpoint)
			.field("force_path_style", &self.force_path_style)
			.field("delete_wait", &self.delete_wait)
			.field("download_part_size", &self.download_part_size)
			.finish()
	}
}

/// Configuration for the Google Cloud Storage adapter.
#[cfg(feature = "gcs")]
#[derive(Debug, Clone)]
pub struct GcsConfig {
	/// GCS project ID
	pub project_id: String,
	/// Service account credentials file. Without one the client is anonymous,
	/// which only suits emulators and public buckets.
	pub credentials_file: Option<PathBuf>,
	/// Grant `allUsers` read access after each upload
	pub public: bool,
	/// Custom endpoint URL (for fake-gcs-server)
	pub endpoint: Option<String>,
}

#[cfg(feature = "gcs")]
impl GcsConfig {
	/// Create a new GCS configuration
	///
	/// # Examples
	///
	/// ```
	/// use cloudstore_storages::config::GcsConfig;
	///
	/// let config = GcsConfig::new("my-project")
	///     .with_credentials_file("/etc/gcs/key.json")
	///     .with_public(true);
	/// assert_eq!(config.project_id, "my-project");
	/// assert!(config.public);
	/// ```
	pub fn new(project_id: impl Into<String>) -> Self {
		Self {
			project_id: project_id.into(),
			credentials_file: None,
			public: false,
			endpoint: None,
		}
	}

	/// Set service account credentials file
	pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.credentials_file = Some(path.into());
		self
	}

	/// Set public visibility for uploaded objects
	pub fn with_public(mut self, public: bool) -> Self {
		self.public = public;
		self
	}

	/// Set custom endpoint URL
	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
		self
	}
}

/// Configuration for the local file system adapter.
///
/// Each bucket is a directory directly under `root`.
#[cfg(feature = "local")]
#[derive(Debug, Clone)]
pub struct LocalConfig {
	/// Directory holding one sub-directory per bucket
	pub root: PathBuf,
}

#[cfg(feature = "local")]
impl LocalConfig {
	/// Create a new local configuration rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub enum StorageConfig {
	#[cfg(feature = "s3")]
	S3(S3Config),
	#[cfg(feature = "gcs")]
	Gcs(GcsConfig),
	#[cfg(feature = "local")]
	Local(LocalConfig),
}

impl StorageConfig {
	/// Backend selected by this configuration.
	pub fn backend_type(&self) -> BackendType {
		match self {
			#[cfg(feature = "s3")]
			StorageConfig::S3(_) => BackendType::S3,
			#[cfg(feature = "gcs")]
			StorageConfig::Gcs(_) => BackendType::Gcs,
			#[cfg(feature = "local")]
			StorageConfig::Local(_) => BackendType::Local,
		}
	}

	/// Load configuration from environment variables.
	///
	/// Meant for binaries and tests; adapters never call it themselves.
	///
	/// # Environment Variables
	///
	/// - `STORAGE_BACKEND`: Backend type ("s3", "gcs", "local")
	///
	/// ## S3 Backend
	/// - `S3_REGION`: AWS region (required)
	/// - `S3_ACCESS_KEY_ID`: Access key id (required)
	/// - `S3_SECRET_ACCESS_KEY`: Secret access key (required)
	/// - `S3_SESSION_TOKEN`: Session token (optional)
	/// - `S3_ENDPOINT`: Custom endpoint URL (optional)
	///
	/// ## GCS Backend
	/// - `GCS_PROJECT_ID`: Project id (required)
	/// - `GCS_CREDENTIALS_FILE`: Service account key file (optional)
	/// - `GCS_PUBLIC`: "true" to make uploads world readable (optional)
	/// - `GCS_ENDPOINT`: Custom endpoint URL (optional)
	///
	/// ## Local Backend
	/// - `LOCAL_ROOT`: Directory holding the buckets (required)
	pub fn from_env() -> Result<Self> {
		let backend_type = required_var("STORAGE_BACKEND")?;
		let backend_type = backend_type.parse::<BackendType>()?;

		match backend_type {
			#[cfg(feature = "s3")]
			BackendType::S3 => {
				let mut config = S3Config::new(
					required_var("S3_REGION")?,
					required_var("S3_ACCESS_KEY_ID")?,
					required_var("S3_SECRET_ACCESS_KEY")?,
				);
				if let Ok(token) = env::var("S3_SESSION_TOKEN") {
					config = config.with_session_token(token);
				}
				if let Ok(endpoint) = env::var("S3_ENDPOINT") {
					config = config.with_endpoint(endpoint);
				}

				Ok(StorageConfig::S3(config))
			}
			#[cfg(feature = "gcs")]
			BackendType::Gcs => {
				let mut config = GcsConfig::new(required_var("GCS_PROJECT_ID")?);
				if let Ok(path) = env::var("GCS_CREDENTIALS_FILE") {
					config = config.with_credentials_file(path);
				}
				if let Ok(public) = env::var("GCS_PUBLIC") {
					let public = public.parse::<bool>().map_err(|_| {
						StorageError::ConfigError(format!(
							"GCS_PUBLIC must be \"true\" or \"false\", got: {}",
							public
						))
					})?;
					config = config.with_public(public);
				}
				if let Ok(endpoint) = env::var("GCS_ENDPOINT") {
					config = config.with_endpoint(endpoint);
				}

				Ok(StorageConfig::Gcs(config))
			}
			#[cfg(feature = "local")]
			BackendType::Local => Ok(StorageConfig::Local(LocalConfig::new(required_var(
				"LOCAL_ROOT",
			)?))),
			#[allow(unreachable_patterns)]
			_ => Err(StorageError::ConfigError(format!(
				"Backend type not enabled: {}",
				backend_type
			))),
		}
	}
}

fn required_var(name: &str) -> Result<String> {
	env::var(name).map_err(|_| {
		StorageError::ConfigError(format!("{} environment variable not set", name))
	})
}
