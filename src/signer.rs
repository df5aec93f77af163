//! JS-SDK URL signer and the inbound request adapter.
//!
//! The digest input is `jsapi_ticket=<ticket>&noncestr=<nonce>&timestamp=<ts>&url=<url>`, hashed
//! with SHA-1 and hex-encoded. The field order is fixed by the client-side verifier.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};
use url::form_urlencoded;
// self
use crate::{_prelude::*, engine::Engine, http::IssuerHttpClient};

/// `errCode` for a missing or empty URL.
pub const MISSING_URL_CODE: u16 = 4001;
/// `errCode` when the ticket could not be resolved.
pub const TICKET_FAILURE_CODE: u16 = 4002;

/// Signed payload handed to the browser-side SDK.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
	/// Configured app id.
	pub app_id: String,
	/// Random alphanumeric nonce.
	pub nonce_str: String,
	/// Unix timestamp in seconds.
	pub timestamp: i64,
	/// URL exactly as supplied by the caller.
	pub url: String,
	/// Lowercase hex SHA-1 digest.
	pub signature: String,
}

/// Response body of the inbound handler; errors live in `errCode`, never in the HTTP status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResult {
	/// `0` on success, [`MISSING_URL_CODE`] or [`TICKET_FAILURE_CODE`] otherwise.
	pub err_code: u16,
	/// Human-readable failure description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub msg: Option<String>,
	/// Signed payload on success.
	#[serde(flatten)]
	pub signature: Option<Signature>,
}
impl SignResult {
	/// Returns `true` when `errCode` is zero.
	pub fn is_success(&self) -> bool {
		self.err_code == 0
	}
}
impl From<Signature> for SignResult {
	fn from(signature: Signature) -> Self {
		Self { err_code: 0, msg: None, signature: Some(signature) }
	}
}
impl From<SignError> for SignResult {
	fn from(err: SignError) -> Self {
		Self { err_code: err.code(), msg: Some(err.to_string()), signature: None }
	}
}

/// Failures reported by [`Engine::try_sign`].
#[derive(Debug, ThisError)]
pub enum SignError {
	/// URL was empty; no I/O happened.
	#[error("argument url must be provided!")]
	MissingUrl,
	/// Ticket resolution failed.
	#[error("{0}")]
	Ticket(#[source] Error),
}
impl SignError {
	/// Numeric `errCode` for this failure.
	pub fn code(&self) -> u16 {
		match self {
			Self::MissingUrl => MISSING_URL_CODE,
			Self::Ticket(_) => TICKET_FAILURE_CODE,
		}
	}
}

/// URL to sign, extracted from an inbound request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SignRequest {
	/// URL of the page that will call the JS-SDK.
	#[serde(default)]
	pub url: Option<String>,
}
impl SignRequest {
	/// Creates a request for `url`.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: Some(url.into()) }
	}

	/// Takes `url` from the query string first, then from a JSON or form-encoded body.
	pub fn from_query_or_body(query: Option<&str>, body: Option<&[u8]>) -> Self {
		let from_query = query.and_then(|q| form_param(q.as_bytes()));
		let url = from_query.or_else(|| {
			let body = body?;

			serde_json::from_slice::<SignRequest>(body)
				.ok()
				.and_then(|request| request.url)
				.filter(|url| !url.is_empty())
				.or_else(|| form_param(body))
		});

		Self { url }
	}
}

impl<C> Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	/// Signs `url` with a freshly resolved ticket.
	pub async fn try_sign(&self, url: &str) -> Result<Signature, SignError> {
		if url.is_empty() {
			return Err(SignError::MissingUrl);
		}

		let ticket = self.ticket().await.map_err(SignError::Ticket)?;
		let timestamp = OffsetDateTime::now_utc().unix_timestamp();
		let nonce_str = nonce_str(self.config.nonce_length);
		let signature = signature(ticket.expose(), &nonce_str, timestamp, url);

		Ok(Signature {
			app_id: self.config.identity.app_id.to_string(),
			nonce_str,
			timestamp,
			url: url.to_owned(),
			signature,
		})
	}

	/// Signs `url`, folding failures into the `errCode` response shape.
	pub async fn sign(&self, url: &str) -> SignResult {
		match self.try_sign(url).await {
			Ok(signature) => signature.into(),
			Err(e) => {
				if let SignError::Ticket(cause) = &e {
					tracing::warn!(error = %cause, "Failed to resolve the ticket for signing.");
				}

				e.into()
			},
		}
	}

	/// Request handler for an HTTP layer: always answer with status 200 and this body.
	pub async fn handle(&self, request: SignRequest) -> SignResult {
		self.sign(request.url.as_deref().unwrap_or_default()).await
	}
}

/// Generates a random alphanumeric nonce of exactly `length` characters.
pub fn nonce_str(length: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(length).map(char::from).collect()
}

/// Computes the lowercase hex SHA-1 signature over the canonical string.
pub fn signature(ticket: &str, nonce_str: &str, timestamp: i64, url: &str) -> String {
	let mut hasher = Sha1::new();

	hasher.update(
		format!("jsapi_ticket={ticket}&noncestr={nonce_str}&timestamp={timestamp}&url={url}")
			.as_bytes(),
	);

	format!("{:x}", hasher.finalize())
}

fn form_param(input: &[u8]) -> Option<String> {
	form_urlencoded::parse(input)
		.find(|(key, value)| key == "url" && !value.is_empty())
		.map(|(_, value)| value.into_owned())
}
