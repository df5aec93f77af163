// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::credential::CredentialKind;

/// Thread-safe counters describing where resolved values came from.
#[derive(Debug, Default)]
pub struct EngineMetrics {
	fast_path_hits: AtomicU64,
	store_hits: AtomicU64,
	store_failures: AtomicU64,
	access_token_refreshes: AtomicU64,
	ticket_refreshes: AtomicU64,
}
impl EngineMetrics {
	/// Values served from the in-process cache without I/O.
	pub fn fast_path_hits(&self) -> u64 {
		self.fast_path_hits.load(Ordering::Relaxed)
	}

	/// Values served from the persistence backend.
	pub fn store_hits(&self) -> u64 {
		self.store_hits.load(Ordering::Relaxed)
	}

	/// Backend reads or writes that failed.
	pub fn store_failures(&self) -> u64 {
		self.store_failures.load(Ordering::Relaxed)
	}

	/// Successful issuer round trips for `kind`.
	pub fn refreshes(&self, kind: CredentialKind) -> u64 {
		self.refresh_counter(kind).load(Ordering::Relaxed)
	}

	pub(crate) fn record_fast_path_hit(&self) {
		self.fast_path_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_store_hit(&self) {
		self.store_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_store_failure(&self) {
		self.store_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self, kind: CredentialKind) {
		self.refresh_counter(kind).fetch_add(1, Ordering::Relaxed);
	}

	fn refresh_counter(&self, kind: CredentialKind) -> &AtomicU64 {
		match kind {
			CredentialKind::AccessToken => &self.access_token_refreshes,
			CredentialKind::Ticket => &self.ticket_refreshes,
		}
	}
}
