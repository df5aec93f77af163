//! App identity used when asking the issuer for an access token.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, credential::CredentialSecret};

/// Error returned when the app identifier fails validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("App identifier cannot be empty.")]
	Empty,
}

/// Public-account app id, or corporate id in corporate mode.
///
/// The issuer owns the identifier format, so any non-empty string is accepted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);
impl AppId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for AppId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for AppId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<AppId> for String {
	fn from(value: AppId) -> Self {
		value.0
	}
}
impl TryFrom<String> for AppId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for AppId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AppId({})", self.0)
	}
}
impl Display for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Single credential identity served by one engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
	/// App id (`appid`) or corporate id (`corpid`).
	pub app_id: AppId,
	/// App secret (`secret`) or corporate secret (`corpsecret`).
	pub secret: CredentialSecret,
	/// Selects the corporate issuer endpoints.
	pub corp: bool,
}

fn validate(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn app_id_only_rejects_empty() {
		assert_eq!(AppId::new(""), Err(IdentifierError::Empty));
		assert_eq!(AppId::new("wx 1").map(String::from).as_deref(), Ok("wx 1"));
		assert!(AppId::new("w".repeat(128)).is_ok());
		assert_eq!("".parse::<AppId>(), Err(IdentifierError::Empty));

		let id = AppId::new("wx8372b24417f593f2").expect("App id fixture should be valid.");

		assert_eq!(id.as_ref(), "wx8372b24417f593f2");
	}

	#[test]
	fn identity_debug_redacts_secret() {
		let identity = Identity {
			app_id: AppId::new("wx1").expect("App id fixture should be valid."),
			secret: CredentialSecret::new("top-secret"),
			corp: false,
		};
		let rendered = format!("{identity:?}");

		assert!(rendered.contains("AppId(wx1)"));
		assert!(!rendered.contains("top-secret"));
	}
}
