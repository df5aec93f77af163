#![cfg(feature = "reqwest")]

// std
use std::{env, fs, process};
// self
use jssdk_broker::{
	_preludet::*,
	credential::{CredentialKind, CredentialRecord},
	store::{CredentialStore, FileStore},
};

fn temp_path(label: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"jssdk_broker_store_{label}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	))
}

fn cleanup(paths: &[&PathBuf]) {
	for path in paths {
		if path.exists() {
			fs::remove_file(path).unwrap_or_else(|e| {
				panic!("Failed to remove temporary record file {}: {e}", path.display())
			});
		}
	}
}

#[tokio::test]
async fn saved_records_read_back_identically() {
	let token_path = temp_path("token");
	let ticket_path = temp_path("ticket");
	let store = FileStore::new(&token_path, &ticket_path);
	let expires_at = OffsetDateTime::now_utc() + Duration::seconds(7000);
	let token = CredentialRecord::new("ACCESS", expires_at);
	let ticket = CredentialRecord::new("TICKET", expires_at);

	store.save(CredentialKind::AccessToken, token.clone()).await.expect("Token save should succeed.");
	store.save(CredentialKind::Ticket, ticket.clone()).await.expect("Ticket save should succeed.");

	let reopened = FileStore::new(&token_path, &ticket_path);
	let fetched_token = reopened
		.fetch(CredentialKind::AccessToken)
		.await
		.expect("Token fetch should succeed.")
		.expect("Token record should exist.");
	let fetched_ticket = reopened
		.fetch(CredentialKind::Ticket)
		.await
		.expect("Ticket fetch should succeed.")
		.expect("Ticket record should exist.");

	assert_eq!(fetched_token.value.expose(), "ACCESS");
	assert_eq!(fetched_token.expires_at, token.expires_at);
	assert_eq!(fetched_ticket, ticket);

	let raw = fs::read_to_string(&ticket_path).expect("Ticket file should be readable.");

	assert!(raw.starts_with("{\"ticket\":\"TICKET\",\"expireTime\":"));

	cleanup(&[&token_path, &ticket_path]);
}

#[tokio::test]
async fn missing_empty_and_corrupt_files_read_as_absent() {
	let token_path = temp_path("absent_token");
	let ticket_path = temp_path("absent_ticket");
	let store = FileStore::new(&token_path, &ticket_path);

	assert_eq!(store.fetch(CredentialKind::AccessToken).await.expect("Fetch should succeed."), None);

	fs::write(&token_path, "").expect("Empty fixture should be written.");
	fs::write(&ticket_path, "{\"ticket\":").expect("Corrupt fixture should be written.");

	assert_eq!(store.fetch(CredentialKind::AccessToken).await.expect("Fetch should succeed."), None);
	assert_eq!(store.fetch(CredentialKind::Ticket).await.expect("Fetch should succeed."), None);

	cleanup(&[&token_path, &ticket_path]);
}

#[tokio::test]
async fn records_written_by_older_deployments_are_accepted() {
	let token_path = temp_path("legacy_token");
	let ticket_path = temp_path("legacy_ticket");

	fs::write(&token_path, "{\"accessToken\":\"LEGACY\",\"expireTime\":1414591057000}")
		.expect("Legacy fixture should be written.");

	let store = FileStore::new(&token_path, &ticket_path);
	let record = store
		.fetch(CredentialKind::AccessToken)
		.await
		.expect("Fetch should succeed.")
		.expect("Legacy record should parse.");

	assert_eq!(record.value.expose(), "LEGACY");
	assert_eq!(record.expires_at.unix_timestamp(), 1414591057);
	assert!(!record.is_valid(), "A 2014 expiry must read as stale.");

	cleanup(&[&token_path, &ticket_path]);
}

#[tokio::test]
async fn unwritable_location_reports_failure() {
	let blocker = temp_path("blocker");

	fs::write(&blocker, "not a directory").expect("Blocker fixture should be written.");

	let store = FileStore::new(blocker.join("token.json"), blocker.join("ticket.json"));
	let record = CredentialRecord::new("ACCESS", OffsetDateTime::now_utc() + Duration::hours(1));

	assert!(store.save(CredentialKind::AccessToken, record).await.is_err());

	cleanup(&[&blocker]);
}
