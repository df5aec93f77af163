//! Redacting wrapper for credential values and app secrets.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSecret(String);
impl CredentialSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no value has been issued yet.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for CredentialSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CredentialSecret").field(&"<redacted>").finish()
	}
}
impl Display for CredentialSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = CredentialSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "CredentialSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn default_secret_is_empty() {
		assert!(CredentialSecret::default().is_empty());
		assert!(!CredentialSecret::new("x").is_empty());
	}
}
