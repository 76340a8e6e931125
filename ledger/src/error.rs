use govgate_types::ProposalId;
use thiserror::Error;

/// Failure reported by a ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("call reverted: {0}")]
    Reverted(String),

    #[error("proposal {0} does not exist")]
    UnknownProposal(ProposalId),

    #[error("account {0} is locked")]
    AccountLocked(String),

    #[error("unsupported action: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}
