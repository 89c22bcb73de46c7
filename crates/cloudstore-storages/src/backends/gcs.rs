//! Google Cloud Storage adapter.
//!
//! Implements the common contract only. Uploads check the bucket first and
//! grant `allUsers` read access afterwards when the adapter is configured as
//! public.

use async_trait::async_trait;
use google_cloud_storage::client::google_cloud_auth::credentials::CredentialsFile;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::Error as GcsError;
use google_cloud_storage::http::buckets::get::GetBucketRequest;
use google_cloud_storage::http::object_access_controls::ObjectACLRole;
use google_cloud_storage::http::object_access_controls::insert::{
	InsertObjectAccessControlRequest, ObjectAccessControlCreationConfig,
};
use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use tokio::io::AsyncRead;

use super::ClientHandle;
use crate::backend::read_fully;
use crate::config::{BackendType, GcsConfig};
use crate::object::{ObjectLocator, ObjectMetadata};
use crate::{CloudStorage, Result, StorageError};

/// ACL entity granting access to everyone.
const ALL_USERS: &str = "allUsers";

/// Google Cloud Storage adapter.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudstore_storages::CloudStorage;
/// use cloudstore_storages::backends::gcs::GcsStorage;
/// use cloudstore_storages::config::GcsConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GcsConfig::new("my-project")
///     .with_credentials_file("/etc/gcs/key.json")
///     .with_public(true);
///
/// let storage = GcsStorage::new(config).await?;
/// storage
///     .upload(&mut &b"body { color: red; }"[..], "css/style.css", "assets", "text/css")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GcsStorage {
	client: ClientHandle<Client>,
	project_id: String,
	public: bool,
}

impl GcsStorage {
	/// Create a new GCS adapter.
	///
	/// # Authentication
	///
	/// With `credentials_file` set, the service account key in that file is
	/// used. Without it the client is anonymous.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::ConfigError` `` if the credentials file cannot
	/// be read or parsed.
	pub async fn new(config: GcsConfig) -> Result<Self> {
		let client_config = Self::client_config(&config).await?;

		tracing::info!(
			project = %config.project_id,
			public = config.public,
			endpoint = %client_config.storage_endpoint,
			"GCS storage adapter ready"
		);

		Ok(Self {
			client: ClientHandle::new("GCS", Client::new(client_config)),
			project_id: config.project_id,
			public: config.public,
		})
	}

	async fn client_config(config: &GcsConfig) -> Result<ClientConfig> {
		let mut client_config = match &config.credentials_file {
			Some(path) => {
				let path_str = path.to_string_lossy().to_string();
				let credentials = CredentialsFile::new_from_file(path_str)
					.await
					.map_err(|e| {
						StorageError::ConfigError(format!(
							"Failed to load GCS credentials from {}: {}",
							path.display(),
							e
						))
					})?;
				ClientConfig::default()
					.with_credentials(credentials)
					.await
					.map_err(|e| {
						StorageError::ConfigError(format!("Failed to initialize GCS auth: {}", e))
					})?
			}
			None => ClientConfig::default().anonymous(),
		};

		client_config.project_id = Some(config.project_id.clone());
		if let Some(endpoint) = &config.endpoint {
			client_config.storage_endpoint = endpoint.clone();
		}

		Ok(client_config)
	}

	/// Project this adapter was configured for.
	pub fn project_id(&self) -> &str {
		&self.project_id
	}

	async fn ensure_bucket(&self, client: &Client, bucket: &str) -> Result<()> {
		client
			.get_bucket(&GetBucketRequest {
				bucket: bucket.to_string(),
				..Default::default()
			})
			.await
			.map_err(|e| match classify_gcs_error(e, &ObjectLocator::new(bucket, "")) {
				StorageError::NotFound(_) => StorageError::BucketNotFound(bucket.to_string()),
				other => other,
			})?;
		Ok(())
	}

	async fn make_public(&self, client: &Client, locator: &ObjectLocator) -> Result<()> {
		client
			.insert_object_access_control(&public_read_request(locator))
			.await
			.map_err(|e| classify_gcs_error(e, locator))?;
		Ok(())
	}
}

#[async_trait]
impl CloudStorage for GcsStorage {
	async fn upload(
		&self,
		reader: &mut (dyn AsyncRead + Send + Unpin),
		key: &str,
		bucket: &str,
		content_type: &str,
	) -> Result<()> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);
		let metadata = ObjectMetadata::new(content_type).with_public(self.public);

		self.ensure_bucket(&client, bucket).await?;

		let content = read_fully(reader).await?;
		let size = content.len();

		let mut media = Media::new(key.to_string());
		media.content_type = metadata.content_type.clone().into();
		client
			.upload_object(
				&UploadObjectRequest {
					bucket: bucket.to_string(),
					..Default::default()
				},
				content,
				&UploadType::Simple(media),
			)
			.await
			.map_err(|e| classify_gcs_error(e, &locator))?;

		if metadata.public {
			self.make_public(&client, &locator).await?;
		}

		// Confirm the object is visible before reporting success
		client
			.get_object(&GetObjectRequest {
				bucket: bucket.to_string(),
				object: key.to_string(),
				..Default::default()
			})
			.await
			.map_err(|e| classify_gcs_error(e, &locator))?;

		tracing::debug!(
			object = %locator,
			bytes = size,
			public = metadata.public,
			"Uploaded object"
		);
		Ok(())
	}

	async fn read(&self, key: &str, bucket: &str) -> Result<Vec<u8>> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);

		let content = client
			.download_object(
				&GetObjectRequest {
					bucket: bucket.to_string(),
					object: key.to_string(),
					..Default::default()
				},
				&Range::default(),
			)
			.await
			.map_err(|e| classify_gcs_error(e, &locator))?;

		tracing::debug!(object = %locator, bytes = content.len(), "Read object");
		Ok(content)
	}

	async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);

		client
			.delete_object(&DeleteObjectRequest {
				bucket: bucket.to_string(),
				object: key.to_string(),
				..Default::default()
			})
			.await
			.map_err(|e| classify_gcs_error(e, &locator))?;

		tracing::debug!(object = %locator, "Deleted object");
		Ok(())
	}

	fn close(&self) {
		if self.client.release() {
			tracing::info!("GCS storage adapter closed");
		} else {
			tracing::warn!("GCS storage adapter already closed");
		}
	}

	fn backend_type(&self) -> BackendType {
		BackendType::Gcs
	}
}

/// ACL insert granting `allUsers` read access to one object.
fn public_read_request(locator: &ObjectLocator) -> InsertObjectAccessControlRequest {
	InsertObjectAccessControlRequest {
		bucket: locator.bucket.clone(),
		object: locator.key.clone(),
		generation: None,
		acl: ObjectAccessControlCreationConfig {
			entity: ALL_USERS.to_string(),
			role: ObjectACLRole::READER,
		},
	}
}

/// Map a GCS client error onto the storage error taxonomy.
fn classify_gcs_error(error: GcsError, locator: &ObjectLocator) -> StorageError {
	match error {
		GcsError::Response(response) => classify_status(response.code, locator, response.message),
		GcsError::HttpClient(e) => StorageError::TransferError(e.to_string()),
		other => StorageError::BackendError(other.to_string()),
	}
}

fn classify_status(code: u16, locator: &ObjectLocator, message: String) -> StorageError {
	match code {
		404 => StorageError::NotFound(locator.to_string()),
		401 | 403 => StorageError::PermissionDenied(format!("{}: {}", locator, message)),
		_ => StorageError::BackendError(format!("{} ({}): {}", locator, code, message)),
	}
}
