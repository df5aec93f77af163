//! Credential records and their persisted JSON codec.

// crates.io
use serde::de::Error as _;
// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialSecret},
};

/// Value plus expiry for one credential kind.
///
/// A record is valid iff the value is non-empty and `expires_at` lies strictly after the instant
/// of use. Expiry is kept at millisecond precision, matching the persisted format.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
	/// Credential value; callers must avoid logging it.
	pub value: CredentialSecret,
	/// Instant after which the value must be refreshed.
	pub expires_at: OffsetDateTime,
}
impl CredentialRecord {
	/// Empty record expiring at the Unix epoch.
	pub fn empty() -> Self {
		Self { value: CredentialSecret::default(), expires_at: OffsetDateTime::UNIX_EPOCH }
	}

	/// Builds a record for a value issued at `issued_at` and living for `ttl`.
	///
	/// Expiry saturates at the largest representable instant.
	pub fn issued(value: impl Into<String>, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		Self::new(value, issued_at.saturating_add(ttl))
	}

	/// Builds a record with an absolute expiry, truncated to milliseconds.
	pub fn new(value: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		let expires_at = expires_at.replace_millisecond(expires_at.millisecond()).unwrap_or(expires_at);

		Self { value: CredentialSecret::new(value), expires_at }
	}

	/// Returns `true` if the record can be served at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		!self.value.is_empty() && self.expires_at > instant
	}

	/// Convenience helper that checks validity against the current UTC clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Encodes the record as `{accessToken|ticket, expireTime}` JSON.
	pub fn to_persisted(&self, kind: CredentialKind) -> Result<String, serde_json::Error> {
		let value = Some(self.value.expose().to_owned());
		let expire_time = (self.expires_at.unix_timestamp_nanos() / 1_000_000) as i64;
		let persisted = match kind {
			CredentialKind::AccessToken =>
				PersistedRecord { access_token: value, ticket: None, expire_time },
			CredentialKind::Ticket =>
				PersistedRecord { access_token: None, ticket: value, expire_time },
		};

		serde_json::to_string(&persisted)
	}

	/// Decodes a persisted record. An absent value field yields an empty (invalid) record.
	pub fn from_persisted(kind: CredentialKind, bytes: &[u8]) -> Result<Self, serde_json::Error> {
		let persisted: PersistedRecord = serde_json::from_slice(bytes)?;
		let expires_at =
			OffsetDateTime::from_unix_timestamp_nanos(i128::from(persisted.expire_time) * 1_000_000)
				.map_err(serde_json::Error::custom)?;
		let value = match kind {
			CredentialKind::AccessToken => persisted.access_token,
			CredentialKind::Ticket => persisted.ticket,
		};

		Ok(Self { value: CredentialSecret::new(value.unwrap_or_default()), expires_at })
	}
}
impl Default for CredentialRecord {
	fn default() -> Self {
		Self::empty()
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("value", &if self.value.is_empty() { "<empty>" } else { "<redacted>" })
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	access_token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	ticket: Option<String>,
	expire_time: i64,
}
