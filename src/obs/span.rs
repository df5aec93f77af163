// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::{_prelude::*, credential::CredentialKind};

/// Span wrapper used around each credential resolution.
#[derive(Clone, Debug)]
pub struct ResolveSpan {
	span: Span,
}
impl ResolveSpan {
	/// Creates a new span tagged with the credential kind + stage.
	pub fn new(kind: CredentialKind, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("jssdk_broker.resolve", kind = kind.as_str(), stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::{CredentialKind, ResolveSpan};

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = ResolveSpan::new(CredentialKind::AccessToken, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
