//! Signs a page URL against a mock issuer using the default reqwest transport and the in-memory
//! backend, then signs again to show the cached ticket being reused.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use jssdk_broker::{
	config::Config,
	engine::Engine,
	http::ReqwestHttpClient,
	reqwest::Client,
	signer::SignRequest,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"demo-ticket\",\"expires_in\":7200}",
			);
		})
		.await;
	let config = Config::builder("wx8372b24417f593f2", "d649471dad4e9530c2ed7068089d9a82")
		.issuer_base(Url::parse(&server.base_url())?)
		.nonce_length(16)
		.build()?;
	// The mock issuer serves a self-signed certificate.
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(client);
	let engine = <Engine<ReqwestHttpClient>>::with_http_client(config, http_client)?;
	let first = engine.sign("http://yourdomain.com/index.html").await;

	println!("{}", serde_json::to_string_pretty(&first)?);

	let second = engine
		.handle(SignRequest::from_query_or_body(Some("url=http%3A%2F%2Fyourdomain.com%2Fabout"), None))
		.await;

	println!("{}", serde_json::to_string_pretty(&second)?);

	token_mock.assert_async().await;
	ticket_mock.assert_async().await;

	Ok(())
}
