use crate::LedgerError;
use async_trait::async_trait;
use govgate_types::{Address, MemberRole};
use std::sync::Arc;

/// The member registry that owns voting rights.
#[async_trait]
pub trait MemberRegistry: Send + Sync {
    /// Members currently holding `role`, in registry order.
    async fn members(&self, role: MemberRole) -> Result<Vec<Address>, LedgerError>;
}

#[async_trait]
impl<T: MemberRegistry + ?Sized> MemberRegistry for Arc<T> {
    async fn members(&self, role: MemberRole) -> Result<Vec<Address>, LedgerError> {
        (**self).members(role).await
    }
}
