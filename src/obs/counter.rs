// self
use crate::{credential::CredentialKind, obs::ResolveOutcome};

/// Records a resolve outcome via the global metrics recorder (when enabled).
pub fn record_resolve_outcome(kind: CredentialKind, outcome: ResolveOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"jssdk_broker_resolve_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
