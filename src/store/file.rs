//! File-backed [`CredentialStore`]: one JSON document per credential kind.

// std
use std::{
	ffi::OsString,
	fs::{self, File},
	io::{ErrorKind, Write},
};
// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord},
	store::{CredentialStore, StoreError, StoreFuture},
};

/// Persists each record to its own file as `{accessToken|ticket, expireTime}`.
///
/// Missing, empty, or unparsable files read as absent. Writes go through a sibling temp file and
/// a rename so readers never observe a torn document.
#[derive(Clone, Debug)]
pub struct FileStore {
	token_path: PathBuf,
	ticket_path: PathBuf,
}
impl FileStore {
	/// Creates a store over the two record files. Nothing is touched until the first call.
	pub fn new(token_path: impl Into<PathBuf>, ticket_path: impl Into<PathBuf>) -> Self {
		Self { token_path: token_path.into(), ticket_path: ticket_path.into() }
	}

	/// File holding the record for `kind`.
	pub fn path(&self, kind: CredentialKind) -> &Path {
		match kind {
			CredentialKind::AccessToken => &self.token_path,
			CredentialKind::Ticket => &self.ticket_path,
		}
	}

	fn load(kind: CredentialKind, path: &Path) -> Result<Option<CredentialRecord>, StoreError> {
		let bytes = match fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", path.display()),
				}),
		};

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(None);
		}

		match CredentialRecord::from_persisted(kind, &bytes) {
			Ok(record) => Ok(Some(record)),
			Err(e) => {
				tracing::debug!(path = %path.display(), error = %e, "Ignoring unparsable {kind} record.");

				Ok(None)
			},
		}
	}

	fn persist(kind: CredentialKind, path: &Path, record: &CredentialRecord) -> Result<(), StoreError> {
		Self::ensure_parent_exists(path)?;

		let serialized = record.to_persisted(kind).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize {kind} record: {e}"),
		})?;
		let tmp_path = Self::tmp_path(path);

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(serialized.as_bytes()).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn tmp_path(path: &Path) -> PathBuf {
		let mut name = path.file_name().map(OsString::from).unwrap_or_default();

		name.push(".tmp");

		path.with_file_name(name)
	}
}
impl CredentialStore for FileStore {
	fn fetch(&self, kind: CredentialKind) -> StoreFuture<'_, Option<CredentialRecord>> {
		Box::pin(async move { Self::load(kind, self.path(kind)) })
	}

	fn save(&self, kind: CredentialKind, record: CredentialRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move { Self::persist(kind, self.path(kind), &record) })
	}

	fn label(&self) -> &'static str {
		"file"
	}
}
