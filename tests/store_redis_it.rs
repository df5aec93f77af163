#![cfg(all(feature = "redis", feature = "reqwest"))]

// crates.io
use httpmock::prelude::*;
// self
use jssdk_broker::{
	_preludet::*,
	config::{Config, RedisParams},
	credential::CredentialKind,
	engine::Engine,
};

fn unreachable_redis() -> RedisParams {
	RedisParams::new("127.0.0.1", 1)
}

#[tokio::test]
async fn unreachable_redis_degrades_to_memory() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"ACCESS\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/ticket/getticket");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"TICKET\",\"expires_in\":7200}",
			);
		})
		.await;
	let config = test_config_builder(&server.base_url())
		.redis(unreachable_redis())
		.fast_path(false)
		.build()
		.expect("Redis configuration should build.");
	let engine = build_reqwest_test_engine(config);
	let result = engine.sign("http://yourdomain.com/index.html").await;

	assert!(result.is_success(), "Signing should survive a dead Redis: {result:?}.");
	assert!(engine.fast_path.is_forced());

	let ticket = engine.resolve(CredentialKind::Ticket).await.expect("Ticket should be cached.");

	assert_eq!(ticket.expose(), "TICKET");
	assert_eq!(engine.metrics.fast_path_hits(), 1);

	token_mock.assert_calls_async(1).await;
	ticket_mock.assert_calls_async(1).await;
}

#[test]
fn construction_outside_a_runtime_does_not_panic() {
	let config = Config::builder(TEST_APP_ID, TEST_SECRET)
		.redis(unreachable_redis().auth("secret"))
		.build()
		.expect("Redis configuration should build.");
	let engine = Engine::new(config).expect("Engine should build without a runtime.");

	assert!(engine.fast_path.is_forced());
	assert_eq!(engine.store.label(), "redis");
}
