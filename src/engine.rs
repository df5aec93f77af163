//! Credential cache engine: owns the in-process records, the backend handle, and the issuer.
//!
//! [`Engine::resolve`] serves a credential from the cheapest source available: the in-process
//! fast path, then the configured [`CredentialStore`], then the remote issuer. Refreshes of the
//! same kind are single-flight, so concurrent callers past an expiry share one remote call.
//! Backend failures never reach the caller; they force the fast path on instead.

mod counters;
mod fast_path;
mod resolve;

pub use counters::EngineMetrics;
pub use fast_path::FastPath;

// self
use crate::{
	_prelude::*,
	config::{Config, Persistence},
	credential::CredentialKind,
	http::IssuerHttpClient,
	issuer::{self, Issuer},
	store::{CredentialStore, FileStore, MemoryStore},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Credential cache and refresh engine for one identity.
pub struct Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	/// Validated configuration.
	pub config: Arc<Config>,
	/// Persistence backend selected by the configuration (or supplied by the caller).
	pub store: Arc<dyn CredentialStore>,
	/// Issuer client shared by every refresh.
	pub issuer: Arc<Issuer<C>>,
	/// In-process record pair and its enable/forced flags.
	pub fast_path: Arc<FastPath>,
	/// Counters describing where values were served from.
	pub metrics: Arc<EngineMetrics>,
	refresh_guards: Arc<RefreshGuards>,
}
impl<C> Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	/// Builds an engine whose backend follows `config.persistence`.
	///
	/// Redis connections start in the background on the ambient Tokio runtime; a failed attempt
	/// forces the fast path on instead of failing construction.
	pub fn with_http_client(config: Config, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let fast_path = Arc::new(FastPath::new(config.fast_path));
		let store: Arc<dyn CredentialStore> = match &config.persistence {
			Persistence::Memory => Arc::new(MemoryStore::with_slots(fast_path.slots().clone())),
			Persistence::File { token_path, ticket_path } =>
				Arc::new(FileStore::new(token_path.clone(), ticket_path.clone())),
			#[cfg(feature = "redis")]
			Persistence::Redis(params) => {
				let on_failure = {
					let fast_path = fast_path.clone();

					move |_: &crate::store::StoreError| {
						if fast_path.force() {
							tracing::warn!("Redis is unavailable; serving credentials from memory.");
						}
					}
				};

				Arc::new(crate::store::RedisStore::connect(params, on_failure)?)
			},
			#[cfg(not(feature = "redis"))]
			Persistence::Redis(_) => return Err(crate::error::ConfigError::RedisUnsupported.into()),
		};

		Self::assemble(config, fast_path, store, http_client.into())
	}

	/// Builds an engine around a caller-supplied backend, ignoring `config.persistence`.
	pub fn with_store(
		config: Config,
		store: Arc<dyn CredentialStore>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let fast_path = Arc::new(FastPath::new(config.fast_path));

		Self::assemble(config, fast_path, store, http_client.into())
	}

	fn assemble(
		config: Config,
		fast_path: Arc<FastPath>,
		store: Arc<dyn CredentialStore>,
		http_client: Arc<C>,
	) -> Result<Self> {
		let endpoints = issuer::endpoints_for(&config.identity, config.issuer_base.clone())?;
		let issuer = Issuer::new(
			http_client,
			endpoints,
			config.identity.clone(),
			config.credential_ttl,
		);

		Ok(Self {
			config: Arc::new(config),
			store,
			issuer: Arc::new(issuer),
			fast_path,
			metrics: Default::default(),
			refresh_guards: Default::default(),
		})
	}
}
#[cfg(feature = "reqwest")]
impl Engine<ReqwestHttpClient> {
	/// Creates an engine with its own reqwest-backed transport.
	pub fn new(config: Config) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			store: self.store.clone(),
			issuer: self.issuer.clone(),
			fast_path: self.fast_path.clone(),
			metrics: self.metrics.clone(),
			refresh_guards: self.refresh_guards.clone(),
		}
	}
}
impl<C> Debug for Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Engine")
			.field("config", &self.config)
			.field("store", &self.store.label())
			.field("fast_path", &self.fast_path)
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Per-kind single-flight guards. Lock order is ticket, then access token.
#[derive(Debug, Default)]
struct RefreshGuards {
	access_token: AsyncMutex<()>,
	ticket: AsyncMutex<()>,
}
impl RefreshGuards {
	fn for_kind(&self, kind: CredentialKind) -> &AsyncMutex<()> {
		match kind {
			CredentialKind::AccessToken => &self.access_token,
			CredentialKind::Ticket => &self.ticket,
		}
	}
}
