//! The ledger surface the upgrade workflow calls into.
//!
//! The workflow never talks to a chain directly. Everything it needs from the
//! outside world goes through the traits in this crate:
//! - [`RegistryReader`] — live code → address lookups and proxy implementation slots
//! - [`GovernanceLedger`] — proposal creation, ballots, status reads, closing
//! - [`MemberRegistry`] — the member-role snapshot voters are drawn from
//! - [`AccountEnabler`] — funding and unlocking accounts before they sign
//!
//! Every call is asynchronous and is awaited before the next one is issued.

pub mod accounts;
pub mod error;
pub mod governance;
pub mod members;
pub mod registry;

pub use accounts::AccountEnabler;
pub use error::LedgerError;
pub use governance::GovernanceLedger;
pub use members::MemberRegistry;
pub use registry::RegistryReader;
