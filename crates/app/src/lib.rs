//! Intervox application layer.
//!
//! Wires the speech-input, speech-output, and LLM capability crates into the
//! interview session state machine and exposes the runtime the binary (or an
//! embedding UI shell) drives.

pub mod config;
pub mod entitlement;
pub mod runtime;
pub mod session;

pub use config::AppConfig;
pub use entitlement::{EntitlementGate, PrepaidCredits, UnlimitedEntitlements};
pub use runtime::{launch, RuntimeOptions, SessionRuntime};
