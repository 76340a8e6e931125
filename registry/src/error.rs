use govgate_ledger::LedgerError;
use govgate_types::{Address, ContractCode, NetworkId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("contract code {0} is not listed in the registry metadata")]
    UnknownCode(ContractCode),

    #[error("no metadata entry named {0:?}")]
    UnknownName(String),

    #[error("registry returned the zero address for {0}")]
    EmptyAddress(ContractCode),

    #[error("proxy {proxy} for {code} has no implementation")]
    EmptyImplementation { code: ContractCode, proxy: Address },

    #[error("{0} is not proxy-fronted")]
    NotAProxy(ContractCode),

    #[error("metadata has no section for network {0}")]
    UnknownNetwork(NetworkId),

    #[error("failed to fetch registry metadata: {0}")]
    MetadataFetch(String),

    #[error("invalid registry metadata: {0}")]
    MetadataInvalid(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
