// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord, CredentialSecret},
	store::CredentialSlots,
};

/// In-process cache consulted before any backend I/O.
///
/// Once forced (after a backend failure) it stays on for the lifetime of the engine.
#[derive(Debug)]
pub struct FastPath {
	enabled: bool,
	forced: AtomicBool,
	slots: Arc<CredentialSlots>,
}
impl FastPath {
	/// Creates an empty fast path; `enabled` mirrors the configuration.
	pub fn new(enabled: bool) -> Self {
		Self { enabled, forced: AtomicBool::new(false), slots: Default::default() }
	}

	/// Returns `true` when configured on or forced on.
	pub fn is_enabled(&self) -> bool {
		self.enabled || self.is_forced()
	}

	/// Returns `true` once a backend failure forced the fast path on.
	pub fn is_forced(&self) -> bool {
		self.forced.load(Ordering::Acquire)
	}

	/// Forces the fast path on. Returns `true` only for the call that flipped the flag.
	pub fn force(&self) -> bool {
		!self.forced.swap(true, Ordering::AcqRel)
	}

	/// Returns the cached value for `kind` if enabled and valid at `now`.
	pub fn lookup(&self, kind: CredentialKind, now: OffsetDateTime) -> Option<CredentialSecret> {
		if !self.is_enabled() {
			return None;
		}

		let record = self.slots.get(kind);

		record.is_valid_at(now).then_some(record.value)
	}

	/// Stores `record` as the latest known value for `kind`.
	pub fn adopt(&self, kind: CredentialKind, record: CredentialRecord) {
		self.slots.set(kind, record);
	}

	/// Record pair backing this fast path.
	pub fn slots(&self) -> &Arc<CredentialSlots> {
		&self.slots
	}
}
