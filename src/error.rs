//! Engine-level error types shared across the issuer, stores, and signer.

// self
use crate::{_prelude::*, credential::CredentialKind};

/// Engine-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical engine error exposed by public APIs.
///
/// `resolve` never returns [`Error::Storage`]: backend failures fall back to the in-process
/// cache. The variant only surfaces from direct [`CredentialStore`](crate::store::CredentialStore)
/// calls.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Issuer answered with an application error code or a failure status.
	#[error(transparent)]
	Issuer(#[from] IssuerError),
	/// Issuer answered with a body the engine cannot interpret.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponse),
	/// Transport failure (DNS, TCP, TLS) while reaching the issuer.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised while assembling an engine.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Identity is incomplete.
	#[error("appId and secret must be provided!")]
	MissingIdentity,
	/// File persistence selected without both paths.
	#[error("If type = file, tokenFilename and ticketFilename must be provided!")]
	MissingFilenames,
	/// Redis persistence selected without a host or port.
	#[error("If type = redis, redisHost and redisPort must be provided!")]
	MissingRedisConfig,
	/// Redis persistence selected while the `redis` feature is disabled.
	#[error("Redis persistence requires the `redis` crate feature.")]
	RedisUnsupported,
	/// Redis host/port/password cannot form a connection address.
	#[error("Redis address `{address}` is invalid.")]
	InvalidRedisAddress {
		/// Address that failed validation.
		address: String,
	},
	/// Redis client could not be constructed.
	#[error("Redis client could not be constructed.")]
	RedisClient {
		/// Underlying client failure.
		#[source]
		source: BoxError,
	},
	/// Credential lifetime must be positive.
	#[error("The credential TTL must be positive.")]
	NonPositiveTtl,
	/// Credential lifetime exceeds what the issuer grants.
	#[error("The credential TTL must not exceed {max_seconds} seconds.")]
	TtlTooLong {
		/// Largest accepted TTL in seconds.
		max_seconds: i64,
	},
	/// Issuer base URL cannot be parsed or joined.
	#[error("Issuer URL is invalid.")]
	InvalidIssuerUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a Redis client construction failure inside [`ConfigError`].
	pub fn redis_client(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::RedisClient { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidIssuerUrl { source }
	}
}

/// Failures reported by the remote issuer.
#[derive(Debug, ThisError)]
pub enum IssuerError {
	/// Issuer returned a non-zero `errcode`.
	#[error("Issuer rejected the {kind} request with errcode {code}: {message}")]
	Rejected {
		/// Credential being requested.
		kind: CredentialKind,
		/// Issuer-supplied `errcode`.
		code: i64,
		/// Issuer-supplied `errmsg`.
		message: String,
	},
	/// Issuer returned a non-2xx HTTP status.
	#[error("Issuer returned HTTP {status} for the {kind} request.")]
	Status {
		/// Credential being requested.
		kind: CredentialKind,
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
}

/// Issuer bodies that cannot be turned into a credential.
#[derive(Debug, ThisError)]
pub enum MalformedResponse {
	/// Body is not the expected JSON document.
	#[error("Issuer returned malformed JSON for the {kind} request.")]
	Parse {
		/// Credential being requested.
		kind: CredentialKind,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// JSON parsed but the credential field is absent or empty.
	#[error("Issuer response for the {kind} request is missing `{field}`.")]
	MissingField {
		/// Credential being requested.
		kind: CredentialKind,
		/// Name of the absent JSON field.
		field: &'static str,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the issuer.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the issuer.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
