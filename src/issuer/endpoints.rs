//! Issuer endpoint builders for public accounts and corporate (enterprise) accounts.

// self
use crate::{
	_prelude::*,
	credential::{CredentialSecret, Identity},
	error::ConfigError,
};

/// Production origin for public accounts.
pub const PUBLIC_BASE: &str = "https://api.weixin.qq.com/";
/// Production origin for corporate accounts.
pub const CORPORATE_BASE: &str = "https://qyapi.weixin.qq.com/";

/// Builds the two issuer URLs for one account flavor.
pub trait IssuerEndpoints
where
	Self: Send + Sync + Debug,
{
	/// URL answering with `{access_token, expires_in}`.
	fn access_token_url(&self, identity: &Identity) -> Result<Url, ConfigError>;

	/// URL answering with `{errcode, errmsg, ticket, expires_in}`.
	fn ticket_url(&self, access_token: &CredentialSecret) -> Result<Url, ConfigError>;
}

/// Public (official) account endpoints under `https://api.weixin.qq.com/`.
#[derive(Clone, Debug)]
pub struct PublicAccountEndpoints {
	base: Url,
}
impl PublicAccountEndpoints {
	/// Uses `base` (ending in `/`) or the production origin.
	pub fn new(base: Option<Url>) -> Result<Self, ConfigError> {
		Ok(Self { base: base_or(base, PUBLIC_BASE)? })
	}
}
impl IssuerEndpoints for PublicAccountEndpoints {
	fn access_token_url(&self, identity: &Identity) -> Result<Url, ConfigError> {
		let mut url = self.base.join("cgi-bin/token")?;

		url.query_pairs_mut()
			.append_pair("grant_type", "client_credential")
			.append_pair("appid", &identity.app_id)
			.append_pair("secret", identity.secret.expose());

		Ok(url)
	}

	fn ticket_url(&self, access_token: &CredentialSecret) -> Result<Url, ConfigError> {
		let mut url = self.base.join("cgi-bin/ticket/getticket")?;

		url.query_pairs_mut()
			.append_pair("type", "jsapi")
			.append_pair("access_token", access_token.expose());

		Ok(url)
	}
}

/// Corporate account endpoints under `https://qyapi.weixin.qq.com/`.
#[derive(Clone, Debug)]
pub struct CorporateEndpoints {
	base: Url,
}
impl CorporateEndpoints {
	/// Uses `base` (ending in `/`) or the production origin.
	pub fn new(base: Option<Url>) -> Result<Self, ConfigError> {
		Ok(Self { base: base_or(base, CORPORATE_BASE)? })
	}
}
impl IssuerEndpoints for CorporateEndpoints {
	fn access_token_url(&self, identity: &Identity) -> Result<Url, ConfigError> {
		let mut url = self.base.join("cgi-bin/gettoken")?;

		url.query_pairs_mut()
			.append_pair("corpid", &identity.app_id)
			.append_pair("corpsecret", identity.secret.expose());

		Ok(url)
	}

	fn ticket_url(&self, access_token: &CredentialSecret) -> Result<Url, ConfigError> {
		let mut url = self.base.join("cgi-bin/get_jsapi_ticket")?;

		url.query_pairs_mut().append_pair("access_token", access_token.expose());

		Ok(url)
	}
}

/// Selects the endpoint variant for `identity`.
pub fn endpoints_for(
	identity: &Identity,
	base: Option<Url>,
) -> Result<Arc<dyn IssuerEndpoints>, ConfigError> {
	Ok(if identity.corp {
		Arc::new(CorporateEndpoints::new(base)?)
	} else {
		Arc::new(PublicAccountEndpoints::new(base)?)
	})
}

fn base_or(base: Option<Url>, default: &str) -> Result<Url, ConfigError> {
	match base {
		Some(url) => Ok(url),
		None => Ok(Url::parse(default)?),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::credential::AppId;

	fn identity(corp: bool) -> Identity {
		Identity {
			app_id: AppId::new("wx1").expect("App id fixture should be valid."),
			secret: CredentialSecret::new("s&1"),
			corp,
		}
	}

	#[test]
	fn public_urls_match_issuer_contract() {
		let endpoints = PublicAccountEndpoints::new(None).expect("Default base should parse.");

		assert_eq!(
			endpoints.access_token_url(&identity(false)).expect("Token URL should build.").as_str(),
			"https://api.weixin.qq.com/cgi-bin/token?grant_type=client_credential&appid=wx1&secret=s%261"
		);
		assert_eq!(
			endpoints
				.ticket_url(&CredentialSecret::new("tok"))
				.expect("Ticket URL should build.")
				.as_str(),
			"https://api.weixin.qq.com/cgi-bin/ticket/getticket?type=jsapi&access_token=tok"
		);
	}

	#[test]
	fn corporate_urls_match_issuer_contract() {
		let endpoints = endpoints_for(&identity(true), None).expect("Default base should parse.");

		assert_eq!(
			endpoints.access_token_url(&identity(true)).expect("Token URL should build.").as_str(),
			"https://qyapi.weixin.qq.com/cgi-bin/gettoken?corpid=wx1&corpsecret=s%261"
		);
		assert_eq!(
			endpoints
				.ticket_url(&CredentialSecret::new("tok"))
				.expect("Ticket URL should build.")
				.as_str(),
			"https://qyapi.weixin.qq.com/cgi-bin/get_jsapi_ticket?access_token=tok"
		);
	}

	#[test]
	fn base_override_keeps_path_prefix() {
		let base = Url::parse("http://127.0.0.1:9000/proxy/").expect("Base should parse.");
		let endpoints = PublicAccountEndpoints::new(Some(base)).expect("Override should apply.");
		let url = endpoints.access_token_url(&identity(false)).expect("Token URL should build.");

		assert_eq!(url.path(), "/proxy/cgi-bin/token");
	}
}
