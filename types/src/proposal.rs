//! Proposal identifiers and the proposal status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the governance contract assigns to a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(u64);

impl ProposalId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of a proposal.
///
/// ```text
/// Created --first ballot--> Open --quorum--> Approved --close--> Executed
///    |                        |
///    +------deadline----------+------------> Rejected
/// ```
///
/// `Executed` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Submitted with its action, no ballots yet.
    Created,
    /// At least one ballot has been cast, quorum not yet reached.
    Open,
    /// Quorum reached; waiting to be closed and executed.
    Approved,
    /// Voting window elapsed without quorum.
    Rejected,
    /// The action has been applied to the registry.
    Executed,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Rejected)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    ///
    /// Staying in the same status is always allowed for non-terminal states.
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        match (self, next) {
            (Executed, _) | (Rejected, _) => false,
            (a, b) if *a == b => true,
            (Created, Open) | (Created, Rejected) => true,
            // A single ballot can satisfy a quorum of one.
            (Created, Approved) => true,
            (Open, Approved) | (Open, Rejected) => true,
            (Approved, Executed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Open => "open",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
