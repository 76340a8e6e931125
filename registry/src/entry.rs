use govgate_types::{Address, ContractCode};
use serde::Serialize;

/// A code's live registry entry.
///
/// `address` is what the registry returns right now; `is_proxy` comes from the
/// session's metadata snapshot and never changes for a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub code: ContractCode,
    pub address: Address,
    pub is_proxy: bool,
}
