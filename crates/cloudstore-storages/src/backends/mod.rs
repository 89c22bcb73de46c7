//! Backend adapter implementations.

use crate::{Result, StorageError};
use parking_lot::RwLock;

#[cfg(feature = "gcs")]
pub mod gcs;
#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

/// Exclusively owned client handle that can be released through `&self`.
pub(crate) struct ClientHandle<C> {
	backend: &'static str,
	inner: RwLock<Option<C>>,
}

impl<C: Clone> ClientHandle<C> {
	pub(crate) fn new(backend: &'static str, client: C) -> Self {
		Self {
			backend,
			inner: RwLock::new(Some(client)),
		}
	}

	/// Clone the client out, failing if it was never set or already released.
	pub(crate) fn get(&self) -> Result<C> {
		self.inner.read().clone().ok_or_else(|| {
			StorageError::ConfigError(format!("{} client is not initialized", self.backend))
		})
	}

	/// Drop the client. Returns `false` if there was nothing to release.
	pub(crate) fn release(&self) -> bool {
		self.inner.write().take().is_some()
	}
}

impl<C> ClientHandle<C> {
	pub(crate) fn is_open(&self) -> bool {
		self.inner.read().is_some()
	}
}

impl<C> std::fmt::Debug for ClientHandle<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClientHandle")
			.field("backend", &self.backend)
			.field("open", &self.is_open())
			.finish()
	}
}
