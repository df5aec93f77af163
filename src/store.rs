//! Persistence contract and built-in backends for credential records.

pub mod file;
pub mod memory;
#[cfg(feature = "redis")] pub mod redis;

pub use file::FileStore;
pub use memory::{CredentialSlots, MemoryStore};
#[cfg(feature = "redis")] pub use self::redis::RedisStore;

// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend holding exactly two records, one per [`CredentialKind`].
///
/// Implementations report failures instead of panicking; the engine treats every failure as a
/// reason to fall back to its in-process cache.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the record for `kind`. `Ok(None)` means absent or unreadable-but-harmless.
	fn fetch(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialRecord>>;

	/// Persists or replaces the record for `kind`.
	fn save(&self, kind: CredentialKind, record: CredentialRecord) -> StoreFuture<'_, ()>;

	/// Short backend label used in logs.
	fn label(&self) -> &'static str;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend has no usable connection.
	#[error("The {backend} backend is not connected.")]
	Disconnected {
		/// Backend label.
		backend: &'static str,
	},
}
