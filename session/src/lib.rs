//! Upgrade sessions.
//!
//! A session fetches the registry metadata once, selects voters from the
//! member registry, enables their accounts, and then applies upgrade steps
//! one at a time: baseline, encode, submit and vote, verify.

pub mod config;
pub mod error;
pub mod session;

pub use config::{RehearsalConfig, SessionConfig, UpgradeStep, VoterSelection};
pub use error::SessionError;
pub use session::{SessionLedger, StepOutcome, UpgradeSession};
