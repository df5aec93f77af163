//! In-process record pair shared by the engine's fast path and the memory backend.

// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord},
	store::{CredentialStore, StoreFuture},
};

/// The two in-process records owned by one engine.
#[derive(Debug, Default)]
pub struct CredentialSlots {
	access_token: RwLock<CredentialRecord>,
	ticket: RwLock<CredentialRecord>,
}
impl CredentialSlots {
	/// Returns a copy of the record for `kind`.
	pub fn get(&self, kind: CredentialKind) -> CredentialRecord {
		self.slot(kind).read().clone()
	}

	/// Replaces the record for `kind`.
	pub fn set(&self, kind: CredentialKind, record: CredentialRecord) {
		*self.slot(kind).write() = record;
	}

	fn slot(&self, kind: CredentialKind) -> &RwLock<CredentialRecord> {
		match kind {
			CredentialKind::AccessToken => &self.access_token,
			CredentialKind::Ticket => &self.ticket,
		}
	}
}

/// Backend that reads and writes the engine's own slots; it never fails.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<CredentialSlots>);
impl MemoryStore {
	/// Shares existing slots, typically the engine's fast-path slots.
	pub fn with_slots(slots: Arc<CredentialSlots>) -> Self {
		Self(slots)
	}
}
impl CredentialStore for MemoryStore {
	fn fetch(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialRecord>> {
		let slots = self.0.clone();

		Box::pin(async move { Ok(Some(slots.get(kind))) })
	}

	fn save(&self, kind: CredentialKind, record: CredentialRecord) -> StoreFuture<'_, ()> {
		let slots = self.0.clone();

		Box::pin(async move {
			slots.set(kind, record);

			Ok(())
		})
	}

	fn label(&self) -> &'static str {
		"memory"
	}
}
