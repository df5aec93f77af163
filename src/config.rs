//! Immutable engine configuration, its validating builder, and the serde options surface.

pub mod options;

pub use options::*;

// self
use crate::{
	_prelude::*,
	credential::{AppId, CredentialSecret, Identity},
	error::ConfigError,
};

/// Nonce length used when none (or zero) is configured.
pub const DEFAULT_NONCE_LENGTH: usize = 16;
/// Upper bound for generated nonces.
pub const MAX_NONCE_LENGTH: usize = 32;
/// Lifetime granted to freshly issued credentials, shorter than the issuer's 7200 seconds.
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::seconds(7000);
/// Longest lifetime the issuer ever grants; configured TTLs above it are rejected.
pub const MAX_CREDENTIAL_TTL: Duration = Duration::seconds(7200);

/// Maps zero to [`DEFAULT_NONCE_LENGTH`] and clamps everything else to [`MAX_NONCE_LENGTH`].
pub fn clamp_nonce_length(length: usize) -> usize {
	match length {
		0 => DEFAULT_NONCE_LENGTH,
		n => n.min(MAX_NONCE_LENGTH),
	}
}

/// Where refreshed credentials are persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Persistence {
	/// In-process only; the fast path is always on.
	#[default]
	Memory,
	/// One JSON file per credential kind.
	File {
		/// File holding the access token record.
		token_path: PathBuf,
		/// File holding the ticket record.
		ticket_path: PathBuf,
	},
	/// One Redis key per credential kind.
	Redis(RedisParams),
}
impl Persistence {
	/// Short label used in logs.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Memory => "memory",
			Self::File { .. } => "file",
			Self::Redis(_) => "redis",
		}
	}
}

/// Redis connection parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisParams {
	/// Host name or address.
	pub host: String,
	/// TCP port.
	pub port: u16,
	/// Optional `AUTH` password.
	pub auth: Option<CredentialSecret>,
}
impl RedisParams {
	/// Creates parameters without a password.
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port, auth: None }
	}

	/// Sets the `AUTH` password.
	pub fn auth(mut self, password: impl Into<String>) -> Self {
		self.auth = Some(CredentialSecret::new(password));

		self
	}

	/// Renders a `redis://` connection URL, embedding the password when present.
	pub fn connection_url(&self) -> Result<Url, ConfigError> {
		let invalid = || ConfigError::InvalidRedisAddress { address: self.address() };
		let mut url = Url::parse(&format!("redis://{}/", self.address())).map_err(|_| invalid())?;

		if let Some(auth) = self.auth.as_ref().filter(|a| !a.is_empty()) {
			url.set_password(Some(auth.expose())).map_err(|_| invalid())?;
		}

		Ok(url)
	}

	fn address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

/// Validated, immutable configuration for one engine.
#[derive(Clone, Debug)]
pub struct Config {
	/// Identity used for every issuer call.
	pub identity: Identity,
	/// Length of generated nonces, within `1..=MAX_NONCE_LENGTH`.
	pub nonce_length: usize,
	/// Configured persistence backend.
	pub persistence: Persistence,
	/// Whether the in-process cache is consulted before the backend.
	pub fast_path: bool,
	/// Emits cache-path decisions as debug events.
	pub debug: bool,
	/// Lifetime granted to freshly issued credentials.
	pub credential_ttl: Duration,
	/// Issuer origin override; `None` selects the public endpoints.
	pub issuer_base: Option<Url>,
}
impl Config {
	/// Starts a builder for the provided identity.
	pub fn builder(app_id: impl Into<String>, secret: impl Into<String>) -> ConfigBuilder {
		ConfigBuilder::new(app_id, secret)
	}
}

/// Builder for [`Config`]; validation happens once in [`ConfigBuilder::build`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
	app_id: String,
	secret: CredentialSecret,
	corp: bool,
	nonce_length: usize,
	persistence: Persistence,
	fast_path: bool,
	debug: bool,
	credential_ttl: Duration,
	issuer_base: Option<Url>,
}
impl ConfigBuilder {
	fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			app_id: app_id.into(),
			secret: CredentialSecret::new(secret),
			corp: false,
			nonce_length: DEFAULT_NONCE_LENGTH,
			persistence: Persistence::Memory,
			fast_path: true,
			debug: false,
			credential_ttl: DEFAULT_CREDENTIAL_TTL,
			issuer_base: None,
		}
	}

	/// Switches to the corporate issuer endpoints.
	pub fn corp(mut self, corp: bool) -> Self {
		self.corp = corp;

		self
	}

	/// Sets the nonce length; see [`clamp_nonce_length`].
	pub fn nonce_length(mut self, length: usize) -> Self {
		self.nonce_length = length;

		self
	}

	/// Selects the persistence backend.
	pub fn persistence(mut self, persistence: Persistence) -> Self {
		self.persistence = persistence;

		self
	}

	/// Persists records to one file per credential kind.
	pub fn file(self, token_path: impl Into<PathBuf>, ticket_path: impl Into<PathBuf>) -> Self {
		self.persistence(Persistence::File {
			token_path: token_path.into(),
			ticket_path: ticket_path.into(),
		})
	}

	/// Persists records to Redis.
	pub fn redis(self, params: RedisParams) -> Self {
		self.persistence(Persistence::Redis(params))
	}

	/// Enables or disables the fast path. Ignored for memory persistence.
	pub fn fast_path(mut self, enabled: bool) -> Self {
		self.fast_path = enabled;

		self
	}

	/// Enables debug events.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Overrides the lifetime granted to issued credentials.
	pub fn credential_ttl(mut self, ttl: Duration) -> Self {
		self.credential_ttl = ttl;

		self
	}

	/// Points issuer calls at a different origin.
	pub fn issuer_base(mut self, base: Url) -> Self {
		self.issuer_base = Some(base);

		self
	}

	/// Consumes the builder and validates the configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		let app_id = AppId::new(&self.app_id).map_err(|_| ConfigError::MissingIdentity)?;

		if self.secret.is_empty() {
			return Err(ConfigError::MissingIdentity);
		}

		match &self.persistence {
			Persistence::Memory => {},
			Persistence::File { token_path, ticket_path } =>
				if token_path.as_os_str().is_empty() || ticket_path.as_os_str().is_empty() {
					return Err(ConfigError::MissingFilenames);
				},
			Persistence::Redis(params) => {
				if params.host.is_empty() || params.port == 0 {
					return Err(ConfigError::MissingRedisConfig);
				}
				if !cfg!(feature = "redis") {
					return Err(ConfigError::RedisUnsupported);
				}

				params.connection_url()?;
			},
		}

		if !self.credential_ttl.is_positive() {
			return Err(ConfigError::NonPositiveTtl);
		}
		if self.credential_ttl > MAX_CREDENTIAL_TTL {
			return Err(ConfigError::TtlTooLong { max_seconds: MAX_CREDENTIAL_TTL.whole_seconds() });
		}

		let fast_path = self.fast_path || matches!(self.persistence, Persistence::Memory);

		Ok(Config {
			identity: Identity { app_id, secret: self.secret, corp: self.corp },
			nonce_length: clamp_nonce_length(self.nonce_length),
			persistence: self.persistence,
			fast_path,
			debug: self.debug,
			credential_ttl: self.credential_ttl,
			issuer_base: self.issuer_base.map(with_trailing_slash),
		})
	}
}

fn with_trailing_slash(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn nonce_length_is_defaulted_and_clamped() {
		assert_eq!(clamp_nonce_length(0), DEFAULT_NONCE_LENGTH);
		assert_eq!(clamp_nonce_length(1), 1);
		assert_eq!(clamp_nonce_length(32), 32);
		assert_eq!(clamp_nonce_length(64), MAX_NONCE_LENGTH);
	}

	#[test]
	fn memory_persistence_forces_fast_path() {
		let config = Config::builder("wx1", "secret")
			.fast_path(false)
			.build()
			.expect("Memory configuration should build.");

		assert!(config.fast_path);

		let config = Config::builder("wx1", "secret")
			.file("token.json", "ticket.json")
			.fast_path(false)
			.build()
			.expect("File configuration should build.");

		assert!(!config.fast_path);
	}

	#[test]
	fn issuer_base_gains_trailing_slash() {
		let base = Url::parse("http://127.0.0.1:8080/proxy").expect("Base URL should parse.");
		let config = Config::builder("wx1", "secret")
			.issuer_base(base)
			.build()
			.expect("Configuration should build.");

		assert_eq!(
			config.issuer_base.as_ref().map(Url::as_str),
			Some("http://127.0.0.1:8080/proxy/")
		);
	}

	#[test]
	fn redis_url_embeds_password() {
		let url = RedisParams::new("127.0.0.1", 6379)
			.auth("hunter2")
			.connection_url()
			.expect("Redis URL should render.");

		assert_eq!(url.as_str(), "redis://:hunter2@127.0.0.1:6379/");
	}

	#[test]
	fn non_positive_ttl_is_rejected() {
		let err = Config::builder("wx1", "secret")
			.credential_ttl(Duration::ZERO)
			.build()
			.expect_err("Zero TTL should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveTtl));
	}

	#[test]
	fn ttl_is_bounded_by_issuer_lifetime() {
		let config = Config::builder("wx1", "secret")
			.credential_ttl(MAX_CREDENTIAL_TTL)
			.build()
			.expect("Issuer lifetime should be accepted as TTL.");

		assert_eq!(config.credential_ttl, MAX_CREDENTIAL_TTL);

		let err = Config::builder("wx1", "secret")
			.credential_ttl(Duration::seconds(i64::MAX))
			.build()
			.expect_err("Oversized TTL should be rejected.");

		assert!(matches!(err, ConfigError::TtlTooLong { max_seconds: 7200 }));
	}
}
