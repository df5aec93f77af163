//! Redis-backed [`CredentialStore`] using one key per credential kind.

// crates.io
use redis::{AsyncCommands, Client, RedisError, aio::MultiplexedConnection};
use tokio::runtime::Handle;
// self
use crate::{
	_prelude::*,
	config::RedisParams,
	credential::{CredentialKind, CredentialRecord},
	error::ConfigError,
	store::{CredentialStore, StoreError, StoreFuture},
};

/// Key holding the access token record.
pub const TOKEN_KEY: &str = "jssdk.token";
/// Key holding the ticket record.
pub const TICKET_KEY: &str = "jssdk.ticket";

const BACKEND: &str = "redis";

enum ConnectionState {
	Connecting,
	Connected(MultiplexedConnection),
	Failed,
}

/// Stores records under [`TOKEN_KEY`] and [`TICKET_KEY`].
///
/// The connection is attempted exactly once, in the background, when the store is created. Until
/// it succeeds (and forever after it fails) every call reports [`StoreError::Disconnected`]
/// without blocking.
#[derive(Clone)]
pub struct RedisStore {
	state: Arc<RwLock<ConnectionState>>,
}
impl RedisStore {
	/// Starts the one-shot connection attempt on the ambient Tokio runtime.
	///
	/// `on_failure` runs once if the attempt fails, or immediately when no runtime is available.
	pub fn connect<F>(params: &RedisParams, on_failure: F) -> Result<Self, ConfigError>
	where
		F: 'static + Send + FnOnce(&StoreError),
	{
		let url = params.connection_url()?;
		let client = Client::open(url.as_str()).map_err(ConfigError::redis_client)?;
		let state = Arc::new(RwLock::new(ConnectionState::Connecting));

		match Handle::try_current() {
			Ok(runtime) => {
				let task_state = state.clone();
				let address = format!("{}:{}", params.host, params.port);

				runtime.spawn(async move {
					match client.get_multiplexed_async_connection().await {
						Ok(connection) => {
							tracing::info!(%address, "Redis connection established.");

							*task_state.write() = ConnectionState::Connected(connection);
						},
						Err(e) => {
							let err = backend_error("connect", e);

							tracing::error!(%address, error = %err, "Redis connection failed.");

							*task_state.write() = ConnectionState::Failed;

							on_failure(&err);
						},
					}
				});
			},
			Err(_) => {
				let err = StoreError::Disconnected { backend: BACKEND };

				tracing::warn!("No Tokio runtime available; Redis connection skipped.");

				*state.write() = ConnectionState::Failed;

				on_failure(&err);
			},
		}

		Ok(Self { state })
	}

	/// Returns `true` once the background connection attempt has succeeded.
	pub fn is_connected(&self) -> bool {
		matches!(*self.state.read(), ConnectionState::Connected(_))
	}

	fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
		match &*self.state.read() {
			ConnectionState::Connected(connection) => Ok(connection.clone()),
			ConnectionState::Connecting | ConnectionState::Failed =>
				Err(StoreError::Disconnected { backend: BACKEND }),
		}
	}

	fn key(kind: CredentialKind) -> &'static str {
		match kind {
			CredentialKind::AccessToken => TOKEN_KEY,
			CredentialKind::Ticket => TICKET_KEY,
		}
	}
}
impl Debug for RedisStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RedisStore").field("connected", &self.is_connected()).finish()
	}
}
impl CredentialStore for RedisStore {
	fn fetch(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialRecord>> {
		Box::pin(async move {
			let mut connection = self.connection()?;
			let raw: Option<String> =
				connection.get(Self::key(kind)).await.map_err(|e| backend_error("GET", e))?;
			let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
				return Ok(None);
			};

			match CredentialRecord::from_persisted(kind, raw.as_bytes()) {
				Ok(record) => Ok(Some(record)),
				Err(e) => {
					tracing::debug!(key = Self::key(kind), error = %e, "Ignoring unparsable {kind} record.");

					Ok(None)
				},
			}
		})
	}

	fn save(&self, kind: CredentialKind, record: CredentialRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut connection = self.connection()?;
			let serialized = record.to_persisted(kind).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize {kind} record: {e}"),
			})?;

			connection
				.set::<_, _, ()>(Self::key(kind), serialized)
				.await
				.map_err(|e| backend_error("SET", e))
		})
	}

	fn label(&self) -> &'static str {
		BACKEND
	}
}

fn backend_error(op: &str, e: RedisError) -> StoreError {
	StoreError::Backend { message: format!("Redis {op} failed: {e}") }
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicBool, Ordering};
	// self
	use super::*;

	#[test]
	fn connect_without_runtime_fails_fast() {
		let failed = Arc::new(AtomicBool::new(false));
		let flag = failed.clone();
		let store = RedisStore::connect(&RedisParams::new("127.0.0.1", 6379), move |_| {
			flag.store(true, Ordering::SeqCst);
		})
		.expect("Store should be created without a runtime.");

		assert!(failed.load(Ordering::SeqCst));
		assert!(!store.is_connected());
		assert_eq!(store.connection().err(), Some(StoreError::Disconnected { backend: BACKEND }));
	}

	#[test]
	fn keys_follow_legacy_layout() {
		assert_eq!(RedisStore::key(CredentialKind::AccessToken), "jssdk.token");
		assert_eq!(RedisStore::key(CredentialKind::Ticket), "jssdk.ticket");
	}
}
