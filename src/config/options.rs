//! Loosely typed option bag mirroring the JSON configuration surface.

// self
use crate::{
	_prelude::*,
	config::{Config, ConfigBuilder, Persistence, RedisParams},
	credential::CredentialSecret,
	error::ConfigError,
};

/// Persistence label accepted by [`Options`]; legacy labels are normalized here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
	/// In-process only (`"memory"`, `"none"`, `"mem"`).
	#[default]
	#[serde(alias = "none", alias = "mem")]
	Memory,
	/// One file per credential kind.
	File,
	/// One Redis key per credential kind.
	Redis,
}

/// Deserializable configuration options.
///
/// ```
/// use jssdk_broker::config::{Config, Options};
///
/// let options: Options = serde_json::from_str(
/// 	r#"{"appId":"wx8372b24417f593f2","secret":"d649471dad4e9530c2ed7068089d9a82","type":"mem"}"#,
/// )
/// .unwrap();
/// let config = Config::try_from(options).unwrap();
///
/// assert!(config.fast_path);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
	/// Use the corporate issuer endpoints.
	pub corp: bool,
	/// App id or corporate id.
	pub app_id: Option<String>,
	/// App secret or corporate secret.
	pub secret: Option<CredentialSecret>,
	/// Nonce length; zero selects the default and larger values clamp to 32.
	pub nonce_str_length: usize,
	/// Persistence backend.
	#[serde(rename = "type")]
	pub persistence: PersistenceMode,
	/// Redis host, required when `type` is `redis`.
	pub redis_host: Option<String>,
	/// Redis port, required when `type` is `redis`.
	pub redis_port: Option<u16>,
	/// Optional Redis password.
	pub redis_auth: Option<CredentialSecret>,
	/// Access token file, required when `type` is `file`.
	pub token_filename: Option<PathBuf>,
	/// Ticket file, required when `type` is `file`.
	pub ticket_filename: Option<PathBuf>,
	/// Consult the in-process cache first; forced on for memory persistence.
	pub cache: bool,
	/// Emit cache-path debug events.
	pub debug: bool,
	/// Issuer origin override.
	pub issuer_base_url: Option<String>,
	/// Credential lifetime in seconds.
	pub credential_ttl: Option<i64>,
}
impl Default for Options {
	fn default() -> Self {
		Self {
			corp: false,
			app_id: None,
			secret: None,
			nonce_str_length: super::DEFAULT_NONCE_LENGTH,
			persistence: PersistenceMode::Memory,
			redis_host: None,
			redis_port: None,
			redis_auth: None,
			token_filename: None,
			ticket_filename: None,
			cache: true,
			debug: false,
			issuer_base_url: None,
			credential_ttl: None,
		}
	}
}
impl TryFrom<Options> for Config {
	type Error = ConfigError;

	fn try_from(options: Options) -> Result<Self, Self::Error> {
		let (Some(app_id), Some(secret)) = (options.app_id, options.secret) else {
			return Err(ConfigError::MissingIdentity);
		};
		let persistence = match options.persistence {
			PersistenceMode::Memory => Persistence::Memory,
			PersistenceMode::File => match (options.token_filename, options.ticket_filename) {
				(Some(token_path), Some(ticket_path)) => Persistence::File { token_path, ticket_path },
				_ => return Err(ConfigError::MissingFilenames),
			},
			PersistenceMode::Redis => match (options.redis_host, options.redis_port) {
				(Some(host), Some(port)) =>
					Persistence::Redis(RedisParams { host, port, auth: options.redis_auth }),
				_ => return Err(ConfigError::MissingRedisConfig),
			},
		};
		let mut builder: ConfigBuilder = Config::builder(app_id, secret.expose())
			.corp(options.corp)
			.nonce_length(options.nonce_str_length)
			.persistence(persistence)
			.fast_path(options.cache)
			.debug(options.debug);

		if let Some(base) = options.issuer_base_url {
			builder = builder.issuer_base(Url::parse(&base)?);
		}
		if let Some(seconds) = options.credential_ttl {
			builder = builder.credential_ttl(Duration::seconds(seconds));
		}

		builder.build()
	}
}
