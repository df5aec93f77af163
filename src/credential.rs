//! Credential vocabulary: kinds, records, secrets, and the configured identity.

pub mod identity;
pub mod kind;
pub mod record;
pub mod secret;

pub use identity::*;
pub use kind::*;
pub use record::*;
pub use secret::*;
