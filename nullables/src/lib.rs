//! Nullable infrastructure for deterministic testing and offline rehearsal.
//!
//! Every external collaborator of the upgrade workflow is abstracted behind a
//! trait. This crate provides in-memory implementations that:
//! - behave like the real contracts for the calls the workflow makes
//! - can be seeded and inspected programmatically
//! - never touch the network
//!
//! Usage: swap real implementations for nullables in tests, or seed a
//! [`NullLedger`] from a metadata snapshot to rehearse an upgrade plan.

pub mod ledger;
pub mod metadata;

pub use ledger::{LedgerCall, NullLedger, DEFAULT_QUORUM};
pub use metadata::StaticMetadataSource;
