//! Selector for the two chained credentials.

// self
use crate::_prelude::*;

/// Identifies which credential an operation targets. Never persisted itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKind {
	/// Access token issued against the app identity.
	AccessToken,
	/// JS-SDK ticket derived from a valid access token.
	Ticket,
}
impl CredentialKind {
	/// Stable label used in spans, metrics, and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::Ticket => "ticket",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
