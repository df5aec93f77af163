//! Interpretation of issuer JSON bodies.

// self
use crate::{
	_prelude::*,
	credential::CredentialKind,
	error::{IssuerError, MalformedResponse},
};

/// Credential value plus the lifetime the issuer claims for it.
#[derive(Clone, PartialEq, Eq)]
pub struct Issued {
	/// Raw credential value.
	pub value: String,
	/// Issuer-reported lifetime in seconds, when present.
	pub expires_in: Option<i64>,
}
impl Issued {
	/// Lifetime to grant locally: `ttl`, shortened by a smaller positive `expires_in`.
	pub fn lifetime(&self, ttl: Duration) -> Duration {
		match self.expires_in {
			Some(secs) if secs > 0 => ttl.min(Duration::seconds(secs)),
			_ => ttl,
		}
	}
}
impl Debug for Issued {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issued")
			.field("value", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

#[derive(Deserialize)]
struct IssuerBody {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	ticket: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(default)]
	errcode: Option<i64>,
	#[serde(default)]
	errmsg: Option<String>,
}

/// Parses an access-token body: a non-empty `access_token` wins, otherwise `errcode` explains why.
pub fn parse_access_token(body: &[u8]) -> Result<Issued> {
	let kind = CredentialKind::AccessToken;
	let body = parse(kind, body)?;

	match body.access_token.filter(|v| !v.is_empty()) {
		Some(value) => Ok(Issued { value, expires_in: body.expires_in }),
		None => match body.errcode {
			Some(code) if code != 0 => Err(rejected(kind, code, body.errmsg)),
			_ => Err(MalformedResponse::MissingField { kind, field: "access_token" }.into()),
		},
	}
}

/// Parses a ticket body: success requires `errcode == 0` and a non-empty `ticket`.
pub fn parse_ticket(body: &[u8]) -> Result<Issued> {
	let kind = CredentialKind::Ticket;
	let body = parse(kind, body)?;

	match body.errcode {
		Some(0) => match body.ticket.filter(|v| !v.is_empty()) {
			Some(value) => Ok(Issued { value, expires_in: body.expires_in }),
			None => Err(MalformedResponse::MissingField { kind, field: "ticket" }.into()),
		},
		Some(code) => Err(rejected(kind, code, body.errmsg)),
		None => Err(MalformedResponse::MissingField { kind, field: "errcode" }.into()),
	}
}

fn parse(kind: CredentialKind, body: &[u8]) -> Result<IssuerBody, MalformedResponse> {
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| MalformedResponse::Parse { kind, source })
}

fn rejected(kind: CredentialKind, code: i64, message: Option<String>) -> Error {
	IssuerError::Rejected { kind, code, message: message.unwrap_or_default() }.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn access_token_success_ignores_errcode_absence() {
		let issued = parse_access_token(br#"{"access_token":"ACCESS","expires_in":7200}"#)
			.expect("Token body should parse.");

		assert_eq!(issued.value, "ACCESS");
		assert_eq!(issued.lifetime(Duration::seconds(7000)), Duration::seconds(7000));
	}

	#[test]
	fn access_token_errcode_is_rejection() {
		let err = parse_access_token(br#"{"errcode":40013,"errmsg":"invalid appid"}"#)
			.expect_err("Errcode body should fail.");

		assert!(matches!(err, Error::Issuer(IssuerError::Rejected { code: 40013, .. })));
	}

	#[test]
	fn access_token_without_field_is_malformed() {
		let err = parse_access_token(br#"{"expires_in":7200}"#).expect_err("Body should fail.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponse::MissingField { field: "access_token", .. })
		));
	}

	#[test]
	fn ticket_requires_zero_errcode() {
		let issued = parse_ticket(br#"{"errcode":0,"errmsg":"ok","ticket":"T","expires_in":3600}"#)
			.expect("Ticket body should parse.");

		assert_eq!(issued.lifetime(Duration::seconds(7000)), Duration::seconds(3600));

		let err = parse_ticket(br#"{"errcode":42001,"errmsg":"access_token expired"}"#)
			.expect_err("Non-zero errcode should fail.");

		assert!(matches!(err, Error::Issuer(IssuerError::Rejected { code: 42001, .. })));

		let err = parse_ticket(br#"{"errcode":0,"ticket":""}"#).expect_err("Empty ticket should fail.");

		assert!(matches!(
			err,
			Error::MalformedResponse(MalformedResponse::MissingField { field: "ticket", .. })
		));
	}

	#[test]
	fn invalid_json_reports_path() {
		let err = parse_ticket(br#"{"errcode":"zero"}"#).expect_err("Wrong type should fail.");

		match err {
			Error::MalformedResponse(MalformedResponse::Parse { source, .. }) =>
				assert_eq!(source.path().to_string(), "errcode"),
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
