//! Governance contract calls.

use crate::LedgerError;
use async_trait::async_trait;
use govgate_types::{ActionData, Address, ProposalCategory, ProposalId, ProposalStatus};
use std::sync::Arc;

/// The governance contract as seen by the proposal workflow.
///
/// Quorum policy lives behind this trait: the workflow only observes the
/// status it reports.
#[async_trait]
pub trait GovernanceLedger: Send + Sync {
    /// Create a proposal in `category` carrying `action`, submitted by `submitter`.
    async fn create_proposal(
        &self,
        category: ProposalCategory,
        action: &ActionData,
        submitter: Address,
    ) -> Result<ProposalId, LedgerError>;

    /// Cast an affirmative ballot from `voter`.
    ///
    /// `Ok(false)` means the governance contract refused the ballot (voter not
    /// authorised, already voted, proposal closed).
    async fn cast_vote(&self, id: ProposalId, voter: Address) -> Result<bool, LedgerError>;

    /// Current status of a proposal.
    async fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError>;

    /// Close the proposal, executing its action if it was approved.
    ///
    /// Returns the status after closing.
    async fn close_proposal(
        &self,
        id: ProposalId,
        closer: Address,
    ) -> Result<ProposalStatus, LedgerError>;
}

#[async_trait]
impl<T: GovernanceLedger + ?Sized> GovernanceLedger for Arc<T> {
    async fn create_proposal(
        &self,
        category: ProposalCategory,
        action: &ActionData,
        submitter: Address,
    ) -> Result<ProposalId, LedgerError> {
        (**self).create_proposal(category, action, submitter).await
    }

    async fn cast_vote(&self, id: ProposalId, voter: Address) -> Result<bool, LedgerError> {
        (**self).cast_vote(id, voter).await
    }

    async fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        (**self).proposal_status(id).await
    }

    async fn close_proposal(
        &self,
        id: ProposalId,
        closer: Address,
    ) -> Result<ProposalStatus, LedgerError> {
        (**self).close_proposal(id, closer).await
    }
}
