//! The registry metadata document and the typed snapshot built from it.

use crate::ResolutionError;
use govgate_types::{Address, ContractCode, NetworkId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The raw metadata document: one section per deployment network.
///
/// ```json
/// { "mainnet": { "abis": [ { "code": "QT", "contractName": "Quotation",
///   "contractAbi": "[...]", "address": "0x…", "isProxy": false } ] } }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    networks: BTreeMap<String, NetworkMetadata>,
}

impl MetadataDocument {
    /// A document with a single network section.
    pub fn single(network: NetworkId, abis: Vec<ContractMetadata>) -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(network.as_str().to_string(), NetworkMetadata { abis });
        Self { networks }
    }

    pub fn network(&self, network: NetworkId) -> Option<&NetworkMetadata> {
        self.networks.get(network.as_str())
    }

    pub fn from_json(json: &str) -> Result<Self, ResolutionError> {
        serde_json::from_str(json).map_err(|e| ResolutionError::MetadataInvalid(e.to_string()))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NetworkMetadata {
    #[serde(default)]
    pub abis: Vec<ContractMetadata>,
}

/// One contract listed in the metadata document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    /// Registry code; 2 bytes for registry-managed contracts, longer for
    /// standalone ones such as the master registry itself.
    pub code: String,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub contract_abi: serde_json::Value,
    pub address: Address,
    #[serde(default)]
    pub is_proxy: bool,
}

impl ContractMetadata {
    pub fn new(code: &str, address: Address, is_proxy: bool) -> Self {
        Self {
            code: code.to_string(),
            contract_name: None,
            contract_abi: serde_json::Value::Null,
            address,
            is_proxy,
        }
    }
}

/// Metadata for a registry-managed code.
#[derive(Clone, Debug)]
pub struct CodeMetadata {
    pub code: ContractCode,
    pub name: Option<String>,
    /// Address at the time the document was published; may be stale.
    pub published_address: Address,
    pub is_proxy: bool,
    pub abi: serde_json::Value,
}

/// Immutable, typed view of one network's metadata for the whole session.
#[derive(Clone, Debug)]
pub struct MetadataSnapshot {
    network: NetworkId,
    codes: BTreeMap<ContractCode, CodeMetadata>,
    named: BTreeMap<String, Address>,
}

impl MetadataSnapshot {
    /// Build the snapshot for `network`.
    ///
    /// Entries whose code is a valid [`ContractCode`] become resolvable codes;
    /// every entry, valid code or not, is also reachable by name. A code listed
    /// twice makes the document invalid.
    pub fn from_document(
        document: &MetadataDocument,
        network: NetworkId,
    ) -> Result<Self, ResolutionError> {
        let section = document
            .network(network)
            .ok_or(ResolutionError::UnknownNetwork(network))?;

        let mut codes = BTreeMap::new();
        let mut named = BTreeMap::new();

        for entry in &section.abis {
            if named.insert(entry.code.clone(), entry.address).is_some() {
                return Err(ResolutionError::MetadataInvalid(format!(
                    "code {:?} listed more than once",
                    entry.code
                )));
            }

            match entry.code.parse::<ContractCode>() {
                Ok(code) => {
                    codes.insert(
                        code,
                        CodeMetadata {
                            code,
                            name: entry.contract_name.clone(),
                            published_address: entry.address,
                            is_proxy: entry.is_proxy,
                            abi: entry.contract_abi.clone(),
                        },
                    );
                }
                Err(_) => {
                    tracing::trace!(name = %entry.code, "metadata entry kept by name only");
                }
            }
        }

        Ok(Self {
            network,
            codes,
            named,
        })
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn get(&self, code: ContractCode) -> Option<&CodeMetadata> {
        self.codes.get(&code)
    }

    pub fn require(&self, code: ContractCode) -> Result<&CodeMetadata, ResolutionError> {
        self.get(code).ok_or(ResolutionError::UnknownCode(code))
    }

    /// Published address of any entry, including non-registry ones like `NXMASTER`.
    pub fn address_by_name(&self, name: &str) -> Result<Address, ResolutionError> {
        self.named
            .get(name)
            .copied()
            .ok_or_else(|| ResolutionError::UnknownName(name.to_string()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &CodeMetadata> {
        self.codes.values()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "mainnet": {
            "abis": [
                { "code": "NXMASTER", "contractName": "NXMaster", "contractAbi": "[]",
                  "address": "0x01bfd82675dbcc7762c84019ca518e701c0cd07e", "isProxy": true },
                { "code": "IC", "contractName": "Incidents", "contractAbi": "[]",
                  "address": "0x8ceba72e4a6eb0c4bbd7a2b6f4a2b3fa0b2f0a11", "isProxy": true },
                { "code": "QT", "contractName": "Quotation",
                  "address": "0x1776651f58a17a50098d31ba3c3cd259c1903f7a" }
            ]
        },
        "kovan": { "abis": [] }
    }"#;

    #[test]
    fn splits_registry_codes_from_named_entries() {
        let doc = MetadataDocument::from_json(DOC).unwrap();
        let snapshot = MetadataSnapshot::from_document(&doc, NetworkId::Mainnet).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get(ContractCode::INCIDENTS).unwrap().is_proxy);
        assert!(!snapshot.get(ContractCode::QUOTATION).unwrap().is_proxy);
        assert!(snapshot.address_by_name("NXMASTER").is_ok());
        assert!(snapshot.address_by_name("QT").is_ok());
        assert!(matches!(
            snapshot.address_by_name("NXMTOKEN"),
            Err(ResolutionError::UnknownName(_))
        ));
    }

    #[test]
    fn missing_network_section_is_an_error() {
        let doc = MetadataDocument::from_json(DOC).unwrap();
        assert!(matches!(
            MetadataSnapshot::from_document(&doc, NetworkId::Localhost),
            Err(ResolutionError::UnknownNetwork(NetworkId::Localhost))
        ));
        let kovan = MetadataSnapshot::from_document(&doc, NetworkId::Kovan).unwrap();
        assert!(kovan.is_empty());
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let doc = MetadataDocument::single(
            NetworkId::Mainnet,
            vec![
                ContractMetadata::new("QT", Address::repeat_byte(1), false),
                ContractMetadata::new("QT", Address::repeat_byte(2), false),
            ],
        );
        assert!(matches!(
            MetadataSnapshot::from_document(&doc, NetworkId::Mainnet),
            Err(ResolutionError::MetadataInvalid(_))
        ));
    }

    #[test]
    fn unknown_code_lookup_fails() {
        let doc = MetadataDocument::from_json(DOC).unwrap();
        let snapshot = MetadataSnapshot::from_document(&doc, NetworkId::Mainnet).unwrap();
        assert!(matches!(
            snapshot.require(ContractCode::POOL),
            Err(ResolutionError::UnknownCode(ContractCode::POOL))
        ));
    }

    #[test]
    fn malformed_json_is_invalid_metadata() {
        assert!(matches!(
            MetadataDocument::from_json("{ not json"),
            Err(ResolutionError::MetadataInvalid(_))
        ));
    }
}
