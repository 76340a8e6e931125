//! The semantic payload of an upgrade proposal.

use crate::EncodingError;
use govgate_types::{Address, ContractCode};
use std::collections::{BTreeMap, BTreeSet};

/// Contract codes paired positionally with their new addresses.
///
/// For a proxy-fronted code the address is the new implementation; for a
/// non-proxy code it is the address the registry should point to. Built only
/// through [`UpgradeIntent::new`], so every value upholds:
/// - at least one pair,
/// - as many codes as addresses,
/// - no repeated code,
/// - no zero address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeIntent {
    codes: Vec<ContractCode>,
    new_addresses: Vec<Address>,
}

impl UpgradeIntent {
    pub fn new(
        codes: Vec<ContractCode>,
        new_addresses: Vec<Address>,
    ) -> Result<Self, EncodingError> {
        if codes.len() != new_addresses.len() {
            return Err(EncodingError::LengthMismatch {
                codes: codes.len(),
                addresses: new_addresses.len(),
            });
        }
        if codes.is_empty() {
            return Err(EncodingError::Empty);
        }

        let mut seen = BTreeSet::new();
        for (code, address) in codes.iter().zip(&new_addresses) {
            if !seen.insert(*code) {
                return Err(EncodingError::DuplicateCode(*code));
            }
            if address.is_zero() {
                return Err(EncodingError::ZeroAddress(*code));
            }
        }

        Ok(Self {
            codes,
            new_addresses,
        })
    }

    /// Intent that upgrades a single code.
    pub fn single(code: ContractCode, new_address: Address) -> Result<Self, EncodingError> {
        Self::new(vec![code], vec![new_address])
    }

    pub fn codes(&self) -> &[ContractCode] {
        &self.codes
    }

    pub fn new_addresses(&self) -> &[Address] {
        &self.new_addresses
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Ordered `(code, new address)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (ContractCode, Address)> + '_ {
        self.codes
            .iter()
            .copied()
            .zip(self.new_addresses.iter().copied())
    }

    /// The registry state this intent should produce, keyed by code.
    pub fn expected(&self) -> BTreeMap<ContractCode, Address> {
        self.pairs().collect()
    }
}
