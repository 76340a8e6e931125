//! A proposal as tracked by the workflow during one session.

use crate::GovernanceError;
use govgate_types::{ActionData, Address, ProposalCategory, ProposalId, ProposalStatus};

/// A proposal submitted by the workflow and the ballots cast on it.
#[derive(Clone, Debug)]
pub struct Proposal {
    /// Id assigned by the governance contract.
    pub id: ProposalId,
    pub category: ProposalCategory,
    /// The encoded action executed on approval.
    pub action_data: ActionData,
    /// Voters supplied by the caller, in ballot order. The first one submitted the proposal.
    pub voters: Vec<Address>,
    /// Ballots accepted so far.
    pub ballots_cast: usize,
    /// Number of ballots after which quorum was first observed.
    pub approved_after: Option<usize>,
    pub status: ProposalStatus,
}

impl Proposal {
    pub(crate) fn created(
        id: ProposalId,
        category: ProposalCategory,
        action_data: ActionData,
        voters: Vec<Address>,
    ) -> Self {
        Self {
            id,
            category,
            action_data,
            voters,
            ballots_cast: 0,
            approved_after: None,
            status: ProposalStatus::Created,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.status == ProposalStatus::Executed
    }

    /// Voters whose ballots were accepted, in order.
    pub fn voted(&self) -> &[Address] {
        &self.voters[..self.ballots_cast.min(self.voters.len())]
    }

    /// Move to `next` along a single lifecycle edge.
    pub fn advance(&mut self, next: ProposalStatus) -> Result<(), GovernanceError> {
        if !self.status.can_transition_to(next) {
            return Err(GovernanceError::IllegalTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        if self.status != next {
            tracing::debug!(proposal = %self.id, from = %self.status, to = %next, "proposal status changed");
            if next == ProposalStatus::Approved {
                self.approved_after = Some(self.ballots_cast);
            }
        }
        self.status = next;
        Ok(())
    }

    /// Catch up with a status reported by the ledger.
    ///
    /// A ledger may fold several edges into one call (approve and execute in
    /// the same transaction), so the happy path is walked edge by edge up to
    /// `observed`. A ledger reporting an earlier status than the one already
    /// seen is an illegal transition.
    pub fn observe(&mut self, observed: ProposalStatus) -> Result<(), GovernanceError> {
        use ProposalStatus::*;

        if observed == self.status {
            return Ok(());
        }
        if observed == Rejected {
            return self.advance(Rejected);
        }
        let path: &[ProposalStatus] = match observed {
            Created => &[Created],
            Open => &[Open],
            Approved => &[Open, Approved],
            Executed => &[Open, Approved, Executed],
            Rejected => &[],
        };
        if happy_rank(self.status) > happy_rank(observed) {
            return Err(GovernanceError::IllegalTransition {
                id: self.id,
                from: self.status,
                to: observed,
            });
        }
        for step in path {
            if happy_rank(*step) >= happy_rank(self.status) {
                self.advance(*step)?;
            }
        }
        Ok(())
    }
}

/// Position on the Created → Open → Approved → Executed path.
fn happy_rank(status: ProposalStatus) -> u8 {
    match status {
        ProposalStatus::Created => 0,
        ProposalStatus::Open => 1,
        ProposalStatus::Approved => 2,
        ProposalStatus::Executed => 3,
        ProposalStatus::Rejected => 4,
    }
}
