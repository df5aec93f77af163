//! Observability helpers for credential resolution.
//!
//! - Every `resolve` runs inside a span named `jssdk_broker.resolve` carrying the `kind`
//!   (credential) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `jssdk_broker_resolve_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`.
//! - Cache-path decisions are logged at debug level only when the configuration's `debug` flag is
//!   set.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveOutcome {
	/// Entry to `resolve`.
	Attempt,
	/// A value was returned.
	Success,
	/// An error propagated back to the caller.
	Failure,
}
impl ResolveOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResolveOutcome::Attempt => "attempt",
			ResolveOutcome::Success => "success",
			ResolveOutcome::Failure => "failure",
		}
	}
}
impl Display for ResolveOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Emits a `tracing::debug!` event when `$enabled` is true.
macro_rules! debug_event {
	($enabled:expr, $($arg:tt)+) => {
		if $enabled {
			::tracing::debug!($($arg)+);
		}
	};
}
pub(crate) use debug_event;
