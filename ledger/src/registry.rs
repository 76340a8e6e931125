//! Read access to the on-chain contract registry.

use crate::LedgerError;
use async_trait::async_trait;
use govgate_types::{Address, ContractCode};
use std::sync::Arc;

#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// Latest address registered for `code`.
    ///
    /// An unregistered code yields the zero address, not an error.
    async fn registry_address(&self, code: ContractCode) -> Result<Address, LedgerError>;

    /// Implementation address stored behind a proxy.
    async fn proxy_implementation(&self, proxy: Address) -> Result<Address, LedgerError>;
}

#[async_trait]
impl<T: RegistryReader + ?Sized> RegistryReader for Arc<T> {
    async fn registry_address(&self, code: ContractCode) -> Result<Address, LedgerError> {
        (**self).registry_address(code).await
    }

    async fn proxy_implementation(&self, proxy: Address) -> Result<Address, LedgerError> {
        (**self).proxy_implementation(proxy).await
    }
}
