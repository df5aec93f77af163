//! Resolution order: fast path, backend, issuer.

// self
use crate::{
	_prelude::*,
	credential::{CredentialKind, CredentialRecord, CredentialSecret},
	engine::Engine,
	http::IssuerHttpClient,
	obs::{self, ResolveOutcome, ResolveSpan, debug_event},
};

impl<C> Engine<C>
where
	C: ?Sized + IssuerHttpClient,
{
	/// Returns a currently valid value for `kind`, refreshing it if needed.
	///
	/// Backend failures are logged and absorbed. Issuer, transport, and malformed-response errors
	/// propagate; nothing is retried.
	pub async fn resolve(&self, kind: CredentialKind) -> Result<CredentialSecret> {
		match kind {
			CredentialKind::AccessToken => self.access_token().await,
			CredentialKind::Ticket => self.ticket().await,
		}
	}

	/// Returns a valid access token.
	pub async fn access_token(&self) -> Result<CredentialSecret> {
		self.resolve_with(CredentialKind::AccessToken, || self.issuer.issue_access_token()).await
	}

	/// Returns a valid ticket, resolving the access token first when a refresh is needed.
	pub async fn ticket(&self) -> Result<CredentialSecret> {
		self.resolve_with(CredentialKind::Ticket, || async {
			let access_token = self.access_token().await?;

			self.issuer.issue_ticket(&access_token).await
		})
		.await
	}

	async fn resolve_with<F, Fut>(&self, kind: CredentialKind, issue: F) -> Result<CredentialSecret>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<CredentialRecord>>,
	{
		let span = ResolveSpan::new(kind, "resolve");

		obs::record_resolve_outcome(kind, ResolveOutcome::Attempt);

		let result = span.instrument(self.resolve_uninstrumented(kind, issue)).await;

		match &result {
			Ok(_) => obs::record_resolve_outcome(kind, ResolveOutcome::Success),
			Err(_) => obs::record_resolve_outcome(kind, ResolveOutcome::Failure),
		}

		result
	}

	async fn resolve_uninstrumented<F, Fut>(
		&self,
		kind: CredentialKind,
		issue: F,
	) -> Result<CredentialSecret>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<CredentialRecord>>,
	{
		let debug = self.config.debug;

		if let Some(value) = self.serve_fast_path(kind) {
			return Ok(value);
		}

		let _singleflight = self.refresh_guards.for_kind(kind).lock().await;

		// A concurrent refresh may have completed while this call waited.
		if let Some(value) = self.serve_fast_path(kind) {
			return Ok(value);
		}

		match self.store.fetch(kind).await {
			Ok(Some(record)) if record.is_valid() => {
				self.metrics.record_store_hit();

				debug_event!(debug, backend = self.store.label(), "Served {kind} from the backend.");

				if self.fast_path.is_enabled() {
					self.fast_path.adopt(kind, record.clone());
				}

				return Ok(record.value);
			},
			Ok(_) => {
				debug_event!(debug, backend = self.store.label(), "No valid {kind} in the backend.");
			},
			Err(e) => {
				self.metrics.record_store_failure();

				tracing::warn!(
					backend = self.store.label(),
					error = %e,
					"Failed to read {kind}; refreshing from the issuer."
				);
			},
		}

		let record = issue().await?;

		self.metrics.record_refresh(kind);

		debug_event!(debug, expires_at = %record.expires_at, "Issued a fresh {kind}.");

		if let Err(e) = self.store.save(kind, record.clone()).await {
			self.metrics.record_store_failure();

			tracing::warn!(backend = self.store.label(), error = %e, "Failed to persist {kind}.");

			if self.fast_path.force() {
				tracing::warn!("Serving credentials from memory for the rest of the process.");
			}
		}

		self.fast_path.adopt(kind, record.clone());

		Ok(record.value)
	}

	fn serve_fast_path(&self, kind: CredentialKind) -> Option<CredentialSecret> {
		let value = self.fast_path.lookup(kind, OffsetDateTime::now_utc())?;

		self.metrics.record_fast_path_hit();

		debug_event!(self.config.debug, "Served {kind} from the in-process cache.");

		Some(value)
	}
}
