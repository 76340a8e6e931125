//! Code registry client.
//!
//! Resolution happens in two layers:
//! - a [`MetadataSnapshot`], fetched once per session from a [`MetadataSource`],
//!   says which codes exist, whether each is proxy-fronted, and where the
//!   named collaborator contracts live;
//! - the live registry, read through [`govgate_ledger::RegistryReader`] on every
//!   [`CodeRegistry::resolve`] call, says where a code points right now.
//!
//! Addresses are never cached, so resolving after an upgrade observes the
//! post-upgrade value.

pub mod client;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod source;

pub use client::CodeRegistry;
pub use entry::RegistryEntry;
pub use error::ResolutionError;
pub use metadata::{CodeMetadata, ContractMetadata, MetadataDocument, MetadataSnapshot, NetworkMetadata};
pub use source::{FileMetadataSource, HttpMetadataSource, MetadataSource};
