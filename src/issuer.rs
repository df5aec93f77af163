//! Remote issuer client: one GET per credential, no retries.

pub mod endpoints;
pub mod response;

pub use endpoints::*;
pub use response::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError,
	http::{Method, Request, header::ACCEPT},
};
// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord, CredentialSecret, Identity},
	error::{ConfigError, IssuerError, TransportError},
	http::IssuerHttpClient,
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Issues access tokens and tickets for one identity.
pub struct Issuer<C>
where
	C: ?Sized + IssuerHttpClient,
{
	http_client: Arc<C>,
	endpoints: Arc<dyn IssuerEndpoints>,
	identity: Identity,
	credential_ttl: Duration,
}
impl<C> Issuer<C>
where
	C: ?Sized + IssuerHttpClient,
{
	/// Creates an issuer talking to `endpoints` through `http_client`.
	pub fn new(
		http_client: Arc<C>,
		endpoints: Arc<dyn IssuerEndpoints>,
		identity: Identity,
		credential_ttl: Duration,
	) -> Self {
		Self { http_client, endpoints, identity, credential_ttl }
	}

	/// Requests a fresh access token.
	pub async fn issue_access_token(&self) -> Result<CredentialRecord> {
		let url = self.endpoints.access_token_url(&self.identity)?;
		let issued_at = OffsetDateTime::now_utc();
		let body = self.get(CredentialKind::AccessToken, url).await?;
		let issued = parse_access_token(&body)?;

		Ok(self.record(issued, issued_at))
	}

	/// Requests a fresh ticket using a valid access token.
	pub async fn issue_ticket(&self, access_token: &CredentialSecret) -> Result<CredentialRecord> {
		let url = self.endpoints.ticket_url(access_token)?;
		let issued_at = OffsetDateTime::now_utc();
		let body = self.get(CredentialKind::Ticket, url).await?;
		let issued = parse_ticket(&body)?;

		Ok(self.record(issued, issued_at))
	}

	fn record(&self, issued: Issued, issued_at: OffsetDateTime) -> CredentialRecord {
		let lifetime = issued.lifetime(self.credential_ttl);

		CredentialRecord::issued(issued.value, issued_at, lifetime)
	}

	async fn get(&self, kind: CredentialKind, url: Url) -> Result<Vec<u8>> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let handle = self.http_client.handle();
		let response = handle.call(request).await.map_err(map_transport_error)?;
		let status = response.status();

		if !status.is_success() {
			let preview = String::from_utf8_lossy(response.body());

			return Err(IssuerError::Status {
				kind,
				status: status.as_u16(),
				body_preview: preview.chars().take(BODY_PREVIEW_LIMIT).collect(),
			}
			.into());
		}

		Ok(response.into_body())
	}
}
impl<C> Debug for Issuer<C>
where
	C: ?Sized + IssuerHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issuer")
			.field("endpoints", &self.endpoints)
			.field("identity", &self.identity)
			.field("credential_ttl", &self.credential_ttl)
			.finish_non_exhaustive()
	}
}

fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Network { source: message.into() }.into(),
		_ => TransportError::Network { source: "unknown HTTP client failure".into() }.into(),
	}
}
