use govgate_ledger::LedgerError;
use govgate_types::{Address, ProposalId, ProposalStatus};
use thiserror::Error;

/// A ballot that did not go through. Fatal to the proposal; never retried.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("ballot from {voter} on proposal {id} was refused")]
    Refused { id: ProposalId, voter: Address },

    #[error("ballot from {voter} on proposal {id} failed: {source}")]
    Ledger {
        id: ProposalId,
        voter: Address,
        source: LedgerError,
    },
}

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("a proposal needs at least one voter")]
    NoVoters,

    #[error("voter {0} appears more than once")]
    DuplicateVoter(Address),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("proposal {id} cannot move from {from} to {to}")]
    IllegalTransition {
        id: ProposalId,
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("proposal {id} was closed but ended up {status}")]
    NotExecuted { id: ProposalId, status: ProposalStatus },
}
