use govgate_action::EncodingError;
use govgate_governance::GovernanceError;
use govgate_ledger::LedgerError;
use govgate_registry::ResolutionError;
use govgate_types::{ContractCode, MemberRole, ProposalCategory, ProposalId, ProposalStatus};
use govgate_verification::VerificationFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(String),

    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{role} has {available} members, cannot select {count} starting at {offset}")]
    NotEnoughMembers {
        role: MemberRole,
        offset: usize,
        count: usize,
        available: usize,
    },

    #[error("{0} is not an upgrade category")]
    NotAnUpgrade(ProposalCategory),

    #[error("{category} cannot upgrade {code}: proxy-fronted is {is_proxy}")]
    CategoryMismatch {
        category: ProposalCategory,
        code: ContractCode,
        is_proxy: bool,
    },

    #[error("step {step} stopped the plan: proposal {id} ended {status}")]
    StepNotExecuted {
        step: usize,
        id: ProposalId,
        status: ProposalStatus,
    },
}
