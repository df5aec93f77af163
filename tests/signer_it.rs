#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use jssdk_broker::{
	_preludet::*,
	signer::{self, SignRequest},
};

const SIGN_URL: &str = "http://yourdomain.com/index.html";

async fn mock_issuer(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token").query_param("appid", TEST_APP_ID);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"ACCESS\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket").query_param("access_token", "ACCESS");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"TICKET\",\"expires_in\":7200}",
			);
		})
		.await;

	(token_mock, ticket_mock)
}

#[tokio::test]
async fn memory_engine_signs_url() {
	let server = MockServer::start_async().await;
	let (token_mock, ticket_mock) = mock_issuer(&server).await;
	let config = test_config_builder(&server.base_url())
		.build()
		.expect("Memory configuration should build.");
	let engine = build_reqwest_test_engine(config);
	let before = OffsetDateTime::now_utc().unix_timestamp();
	let result = engine.sign(SIGN_URL).await;

	assert_eq!(result.err_code, 0);
	assert!(result.msg.is_none());

	let signature = result.signature.expect("Successful result should carry a signature.");

	assert_eq!(signature.app_id, TEST_APP_ID);
	assert_eq!(signature.url, SIGN_URL);
	assert_eq!(signature.nonce_str.len(), 16);
	assert!(signature.nonce_str.chars().all(|c| c.is_ascii_alphanumeric()));
	assert!((signature.timestamp - before).abs() <= 2);
	assert_eq!(signature.signature.len(), 40);
	assert!(signature.signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
	assert_eq!(
		signature.signature,
		signer::signature("TICKET", &signature.nonce_str, signature.timestamp, SIGN_URL)
	);

	token_mock.assert_calls_async(1).await;
	ticket_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_url_is_rejected_before_any_io() {
	let server = MockServer::start_async().await;
	let (token_mock, ticket_mock) = mock_issuer(&server).await;
	let config = test_config_builder(&server.base_url())
		.build()
		.expect("Memory configuration should build.");
	let engine = build_reqwest_test_engine(config);
	let result = engine.sign("").await;
	let json = serde_json::to_string(&result).expect("SignResult should serialize.");

	assert_eq!(json, "{\"errCode\":4001,\"msg\":\"argument url must be provided!\"}");

	token_mock.assert_calls_async(0).await;
	ticket_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn handler_takes_url_from_body_when_query_is_silent() {
	let server = MockServer::start_async().await;
	let (token_mock, ticket_mock) = mock_issuer(&server).await;
	let config = test_config_builder(&server.base_url())
		.build()
		.expect("Memory configuration should build.");
	let engine = build_reqwest_test_engine(config);
	let request = SignRequest::from_query_or_body(
		Some("from=menu"),
		Some(b"{\"url\":\"http://yourdomain.com/index.html\"}"),
	);
	let result = engine.handle(request).await;

	assert!(result.is_success(), "Handler should sign the body URL: {result:?}.");
	assert_eq!(result.signature.map(|s| s.url).as_deref(), Some(SIGN_URL));

	let result = engine.handle(SignRequest::default()).await;

	assert_eq!(result.err_code, 4001);

	token_mock.assert_calls_async(1).await;
	ticket_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn nonce_length_is_clamped() {
	let server = MockServer::start_async().await;
	let (_token_mock, _ticket_mock) = mock_issuer(&server).await;
	let config = test_config_builder(&server.base_url())
		.nonce_length(64)
		.build()
		.expect("Configuration should build.");
	let engine = build_reqwest_test_engine(config);
	let signature = engine.try_sign(SIGN_URL).await.expect("Signing should succeed.");

	assert_eq!(signature.nonce_str.len(), 32);
}
