//! Chained access-token and JS-SDK ticket broker with single-flight refreshes, pluggable
//! persistence that falls back to an in-process cache, and a drop-in URL signer.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod credential;
pub mod engine;
pub mod error;
pub mod http;
pub mod issuer;
pub mod obs;
pub mod signer;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{Config, ConfigBuilder},
		engine::Engine,
		http::ReqwestHttpClient,
	};

	/// Engine type alias used by reqwest-backed integration tests.
	pub type ReqwestTestEngine = Engine<ReqwestHttpClient>;

	/// App identifier shared by test fixtures.
	pub const TEST_APP_ID: &str = "wx8372b24417f593f2";
	/// App secret shared by test fixtures.
	pub const TEST_SECRET: &str = "d649471dad4e9530c2ed7068089d9a82";

	/// Returns a builder for the fixture identity whose issuer calls hit `issuer_base`.
	pub fn test_config_builder(issuer_base: &str) -> ConfigBuilder {
		let base = Url::parse(issuer_base).expect("Mock issuer base URL should parse.");

		Config::builder(TEST_APP_ID, TEST_SECRET).issuer_base(base)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`Engine`] whose reqwest transport trusts the mock issuer.
	pub fn build_reqwest_test_engine(config: Config) -> ReqwestTestEngine {
		Engine::with_http_client(config, test_reqwest_http_client())
			.expect("Failed to build engine for integration tests.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
