//! Amazon S3 storage adapter.
//!
//! Besides the common contract this adapter implements [`ExtendedStorage`]
//! and exposes two backend-native operations, [`S3Storage::upload_with_options`]
//! and [`S3Storage::list_buckets`].
//!
//! Uploads through [`CloudStorage::upload`] always carry the `public-read`
//! canned ACL. The GCS adapter only grants public access when configured to.
//! The two behaviors are kept as they are on purpose; do not unify them
//! without checking with the bucket owners.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::client::Waiters;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder;
use aws_sdk_s3::primitives::{ByteStream, DateTime as AwsDateTime};
use aws_sdk_s3::types::ObjectCannedAcl;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::ClientHandle;
use crate::backend::read_fully;
use crate::config::{BackendType, S3Config};
use crate::object::{BucketDescriptor, ObjectDescriptor, ObjectLocator, ObjectMetadata};
use crate::{CloudStorage, ExtendedStorage, MoveOutcome, Result, StorageError};

/// User metadata entry recording the upload time.
const LAST_MODIFIED_METADATA: &str = "Last-Modified";

/// Amazon S3 storage adapter.
#[derive(Debug)]
pub struct S3Storage {
	client: ClientHandle<Client>,
	delete_wait: Duration,
	download_part_size: u64,
}

impl S3Storage {
	/// Create a new S3 adapter with the static credentials in `config`.
	///
	/// No network call is made here; bad credentials surface on the first
	/// operation.
	///
	/// # Errors
	///
	/// Returns `` `StorageError::ConfigError` `` if the region or credentials
	/// are empty.
	pub fn new(config: S3Config) -> Result<Self> {
		if config.region.is_empty() {
			return Err(StorageError::ConfigError(
				"S3 region must not be empty".to_string(),
			));
		}
		if config.access_key_id.is_empty() || config.secret_access_key.is_empty() {
			return Err(StorageError::ConfigError(
				"S3 credentials must not be empty".to_string(),
			));
		}

		let credentials = Credentials::new(
			config.access_key_id.clone(),
			config.secret_access_key.clone(),
			config.session_token.clone(),
			None,
			"cloudstore",
		);

		let mut builder = aws_sdk_s3::Config::builder()
			.behavior_version(BehaviorVersion::latest())
			.region(Region::new(config.region.clone()))
			.credentials_provider(credentials)
			.force_path_style(config.force_path_style);
		if let Some(endpoint) = &config.endpoint {
			builder = builder.endpoint_url(endpoint);
		}

		tracing::info!(
			region = %config.region,
			endpoint = config.endpoint.as_deref().unwrap_or("default"),
			"S3 storage adapter ready"
		);

		Ok(Self::from_client(Client::from_conf(builder.build()), &config))
	}

	/// Wrap an already configured SDK client.
	pub fn from_client(client: Client, config: &S3Config) -> Self {
		Self {
			client: ClientHandle::new("S3", client),
			delete_wait: config.delete_wait,
			download_part_size: config.download_part_size.max(1),
		}
	}

	/// Upload with backend-native options, bypassing the common contract.
	///
	/// `configure` receives a `PutObject` request builder and must set at least
	/// the bucket, key and body. No ACL or metadata is added.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use aws_sdk_s3::primitives::ByteStream;
	/// use aws_sdk_s3::types::StorageClass;
	/// use cloudstore_storages::backends::s3::S3Storage;
	///
	/// # async fn example(storage: &S3Storage) -> cloudstore_storages::Result<()> {
	/// storage
	///     .upload_with_options(|request| {
	///         request
	///             .bucket("archive")
	///             .key("2024/report.csv")
	///             .body(ByteStream::from_static(b"a,b\n1,2\n"))
	///             .storage_class(StorageClass::Glacier)
	///     })
	///     .await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn upload_with_options<F>(&self, configure: F) -> Result<()>
	where
		F: FnOnce(PutObjectFluentBuilder) -> PutObjectFluentBuilder + Send,
	{
		let client = self.client.get()?;
		let request = configure(client.put_object());
		let locator = ObjectLocator::new(
			request.get_bucket().clone().unwrap_or_default(),
			request.get_key().clone().unwrap_or_default(),
		);

		request
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, &locator))?;

		tracing::debug!(object = %locator, "Uploaded object with custom options");
		Ok(())
	}

	/// List the buckets owned by the credentials.
	pub async fn list_buckets(&self) -> Result<Vec<BucketDescriptor>> {
		let client = self.client.get()?;
		let output = client.list_buckets().send().await.map_err(|e| {
			StorageError::BackendError(format!(
				"Failed to list buckets: {}",
				DisplayErrorContext(&e)
			))
		})?;

		Ok(output
			.buckets()
			.iter()
			.map(|bucket| BucketDescriptor {
				name: bucket.name().unwrap_or_default().to_string(),
				created_at: bucket.creation_date().and_then(to_chrono),
			})
			.collect())
	}

	/// Delete and wait until the backend reports the object gone.
	async fn delete_confirmed(&self, client: &Client, locator: &ObjectLocator) -> Result<()> {
		// S3 deletes succeed for absent keys, so check first
		client
			.head_object()
			.bucket(&locator.bucket)
			.key(&locator.key)
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, locator))?;

		client
			.delete_object()
			.bucket(&locator.bucket)
			.key(&locator.key)
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, locator))?;

		client
			.wait_until_object_not_exists()
			.bucket(&locator.bucket)
			.key(&locator.key)
			.wait(self.delete_wait)
			.await
			.map_err(|e| {
				StorageError::TransferError(format!(
					"Object {} still visible after delete: {}",
					locator,
					DisplayErrorContext(&e)
				))
			})?;

		Ok(())
	}

	async fn get_body(
		&self,
		client: &Client,
		locator: &ObjectLocator,
		range: Option<String>,
	) -> Result<ByteStream> {
		let output = client
			.get_object()
			.bucket(&locator.bucket)
			.key(&locator.key)
			.set_range(range)
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, locator))?;
		Ok(output.body)
	}
}

#[async_trait]
impl CloudStorage for S3Storage {
	async fn upload(
		&self,
		reader: &mut (dyn AsyncRead + Send + Unpin),
		key: &str,
		bucket: &str,
		content_type: &str,
	) -> Result<()> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);
		let metadata = ObjectMetadata::new(content_type).with_public(true);

		let content = read_fully(reader).await?;
		let size = content.len();

		client
			.put_object()
			.bucket(bucket)
			.key(key)
			.body(ByteStream::from(content))
			.content_type(&metadata.content_type)
			.acl(ObjectCannedAcl::PublicRead)
			.metadata(LAST_MODIFIED_METADATA, metadata.last_modified.to_rfc3339())
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, &locator))?;

		tracing::debug!(object = %locator, bytes = size, "Uploaded object");
		Ok(())
	}

	async fn read(&self, key: &str, bucket: &str) -> Result<Vec<u8>> {
		self.download_to_buffer(bucket, key).await
	}

	async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);

		self.delete_confirmed(&client, &locator).await?;

		tracing::debug!(object = %locator, "Deleted object");
		Ok(())
	}

	fn close(&self) {
		if self.client.release() {
			tracing::info!("S3 storage adapter closed");
		} else {
			tracing::warn!("S3 storage adapter already closed");
		}
	}

	fn backend_type(&self) -> BackendType {
		BackendType::S3
	}
}

#[async_trait]
impl ExtendedStorage for S3Storage {
	async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectDescriptor>> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, prefix);

		// TODO: follow continuation tokens; only the first page (1000 keys) is read
		let output = client
			.list_objects_v2()
			.bucket(bucket)
			.prefix(prefix)
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, &locator))?;

		let objects: Vec<ObjectDescriptor> = output
			.contents()
			.iter()
			.map(|object| ObjectDescriptor {
				key: object.key().unwrap_or_default().to_string(),
				size: object.size().unwrap_or(0).max(0) as u64,
				last_modified: object.last_modified().and_then(to_chrono),
				storage_class: object.storage_class().map(|class| class.as_str().to_string()),
				e_tag: object.e_tag().map(str::to_string),
			})
			.collect();

		tracing::debug!(bucket, prefix, count = objects.len(), "Listed objects");
		Ok(objects)
	}

	async fn download_to_buffer(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);

		let body = self.get_body(&client, &locator, None).await?;
		let content = body
			.collect()
			.await
			.map_err(|e| {
				StorageError::TransferError(format!("Failed to read {}: {}", locator, e))
			})?
			.into_bytes()
			.to_vec();

		tracing::debug!(object = %locator, bytes = content.len(), "Read object");
		Ok(content)
	}

	async fn download_to_writer(
		&self,
		bucket: &str,
		key: &str,
		sink: &mut (dyn AsyncWrite + Send + Unpin),
	) -> Result<u64> {
		let client = self.client.get()?;
		let locator = ObjectLocator::new(bucket, key);

		let head = client
			.head_object()
			.bucket(bucket)
			.key(key)
			.send()
			.await
			.map_err(|e| classify_sdk_error(e, &locator))?;
		let total = head.content_length().unwrap_or(0).max(0) as u64;

		let mut written = 0u64;
		for (start, end) in part_ranges(total, self.download_part_size) {
			let mut body = self
				.get_body(&client, &locator, Some(format!("bytes={}-{}", start, end)))
				.await?;

			while let Some(chunk) = body.next().await {
				let chunk = chunk.map_err(|e| {
					StorageError::TransferError(format!("Failed to read {}: {}", locator, e))
				})?;
				sink.write_all(&chunk).await.map_err(|e| {
					StorageError::TransferError(format!("Failed to write {}: {}", locator, e))
				})?;
				written += chunk.len() as u64;
			}
		}

		sink.flush()
			.await
			.map_err(|e| StorageError::TransferError(format!("Failed to flush sink: {}", e)))?;

		tracing::debug!(object = %locator, bytes = written, "Downloaded object");
		Ok(written)
	}

	async fn move_within_bucket(&self, bucket: &str, from_key: &str, to_key: &str) -> MoveOutcome {
		let client = match self.client.get() {
			Ok(client) => client,
			Err(error) => return MoveOutcome::Failed(error),
		};
		let source = ObjectLocator::new(bucket, from_key);
		let target = ObjectLocator::new(bucket, to_key);

		if let Err(e) = client
			.copy_object()
			.bucket(bucket)
			.copy_source(copy_source(&source))
			.key(to_key)
			.send()
			.await
		{
			return MoveOutcome::Failed(classify_sdk_error(e, &source));
		}

		match self.delete_confirmed(&client, &source).await {
			Ok(()) => {
				tracing::debug!(from = %source, to = %target, "Moved object");
				MoveOutcome::FullySucceeded
			}
			Err(error) => {
				tracing::warn!(
					from = %source,
					to = %target,
					error = %error,
					"Object copied but source could not be deleted"
				);
				MoveOutcome::CopiedButDeleteFailed(error)
			}
		}
	}
}

/// Map an SDK error onto the storage error taxonomy.
fn classify_sdk_error<E>(error: SdkError<E, HttpResponse>, locator: &ObjectLocator) -> StorageError
where
	E: ProvideErrorMetadata + std::error::Error + 'static,
{
	let message = DisplayErrorContext(&error).to_string();

	match &error {
		SdkError::ServiceError(context) => {
			let status = context.raw().status().as_u16();
			classify_service_error(context.err().code(), status, locator, message)
		}
		SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
			StorageError::TransferError(message)
		}
		SdkError::ConstructionFailure(_) => StorageError::ConfigError(message),
		_ => StorageError::BackendError(message),
	}
}

fn classify_service_error(
	code: Option<&str>,
	status: u16,
	locator: &ObjectLocator,
	message: String,
) -> StorageError {
	match (code, status) {
		(Some("NoSuchBucket"), _) => StorageError::BucketNotFound(locator.bucket.clone()),
		(Some("NoSuchKey" | "NotFound"), _) | (_, 404) => {
			StorageError::NotFound(locator.to_string())
		}
		(Some("AccessDenied"), _) | (_, 403) => StorageError::PermissionDenied(locator.to_string()),
		_ => StorageError::BackendError(message),
	}
}

/// `bucket/key` with each key segment percent-encoded, as `CopyObject` expects.
fn copy_source(locator: &ObjectLocator) -> String {
	let key = locator
		.key
		.split('/')
		.map(|segment| urlencoding::encode(segment).into_owned())
		.collect::<Vec<_>>()
		.join("/");
	format!("{}/{}", locator.bucket, key)
}

/// Inclusive byte ranges covering `total` bytes in parts of `part_size`.
fn part_ranges(total: u64, part_size: u64) -> Vec<(u64, u64)> {
	let part_size = part_size.max(1);
	let mut ranges = Vec::new();
	let mut start = 0;

	while start < total {
		let end = (start + part_size).min(total) - 1;
		ranges.push((start, end));
		start = end + 1;
	}

	ranges
}

fn to_chrono(value: &AwsDateTime) -> Option<DateTime<Utc>> {
	DateTime::<Utc>::from_timestamp(value.secs(), value.subsec_nanos())
}
