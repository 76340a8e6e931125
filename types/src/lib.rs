//! Fundamental types for governance-gated registry upgrades.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, contract codes, proposal categories and statuses, member roles,
//! action payloads and network identifiers.

pub mod action;
pub mod address;
pub mod category;
pub mod code;
pub mod error;
pub mod network;
pub mod proposal;
pub mod role;

pub use action::ActionData;
pub use address::{parse_address, Address};
pub use category::ProposalCategory;
pub use code::ContractCode;
pub use error::TypesError;
pub use network::NetworkId;
pub use proposal::{ProposalId, ProposalStatus};
pub use role::MemberRole;
