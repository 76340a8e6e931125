use crate::LedgerError;
use async_trait::async_trait;
use govgate_types::Address;
use std::sync::Arc;

/// Makes an account able to send transactions on the target ledger.
#[async_trait]
pub trait AccountEnabler: Send + Sync {
    /// Give the account enough balance to pay for its transactions.
    async fn fund(&self, account: Address) -> Result<(), LedgerError>;

    /// Allow transactions to be sent from the account without its key.
    async fn unlock(&self, account: Address) -> Result<(), LedgerError>;
}

#[async_trait]
impl<T: AccountEnabler + ?Sized> AccountEnabler for Arc<T> {
    async fn fund(&self, account: Address) -> Result<(), LedgerError> {
        (**self).fund(account).await
    }

    async fn unlock(&self, account: Address) -> Result<(), LedgerError> {
        (**self).unlock(account).await
    }
}
