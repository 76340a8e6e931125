//! Upgrade verification.
//!
//! After a proposal runs, every affected code is re-resolved against the live
//! registry and compared with what the proposal intended:
//! - **proxy-fronted** codes must keep their proxy address while the
//!   implementation behind it changes to the target
//! - **non-proxy** codes must have their registry address replaced by the target
//!
//! The verifier only reports. Turning a failed report into an error is the
//! caller's decision, via [`VerificationReport::into_result`].

pub mod error;
pub mod report;
pub mod verifier;

pub use error::VerificationFailure;
pub use report::{CheckKind, CheckOutcome, CodeCheck, VerificationReport};
pub use verifier::{ObservedEntry, RegistrySnapshot, UpgradeVerifier};
