//! Submit → vote → close, as one sequential operation.

use crate::{GovernanceError, Proposal, VoteError};
use govgate_ledger::GovernanceLedger;
use govgate_types::{ActionData, Address, ProposalCategory, ProposalStatus};
use std::collections::HashSet;

/// Drives proposals through a governance ledger.
pub struct ProposalWorkflow<'a, G: ?Sized> {
    governance: &'a G,
}

impl<'a, G: GovernanceLedger + ?Sized> ProposalWorkflow<'a, G> {
    pub fn new(governance: &'a G) -> Self {
        Self { governance }
    }

    /// Create a proposal, cast one affirmative ballot per voter in order, and
    /// close it if quorum was reached.
    ///
    /// Every voter casts a ballot even once quorum has been reached, unless
    /// the ledger has already finalised the proposal. Without quorum the
    /// proposal is returned as Open (or Rejected, if the ledger expired it);
    /// the workflow does not wait for more voters.
    pub async fn submit(
        &self,
        category: ProposalCategory,
        action_data: ActionData,
        voters: &[Address],
    ) -> Result<Proposal, GovernanceError> {
        let submitter = *voters.first().ok_or(GovernanceError::NoVoters)?;
        let mut seen = HashSet::with_capacity(voters.len());
        if let Some(dup) = voters.iter().find(|v| !seen.insert(**v)) {
            return Err(GovernanceError::DuplicateVoter(*dup));
        }

        let id = self
            .governance
            .create_proposal(category, &action_data, submitter)
            .await?;
        tracing::info!(
            proposal = %id,
            %category,
            %submitter,
            voters = voters.len(),
            action_bytes = action_data.len(),
            "proposal created"
        );

        let mut proposal = Proposal::created(id, category, action_data, voters.to_vec());

        for voter in voters {
            if proposal.status.is_terminal() {
                tracing::warn!(
                    proposal = %id,
                    %voter,
                    status = %proposal.status,
                    "proposal already finalised, skipping late ballot"
                );
                continue;
            }
            self.cast_ballot(&mut proposal, *voter).await?;
        }

        match proposal.status {
            ProposalStatus::Approved => {
                let closed = self.governance.close_proposal(id, submitter).await?;
                proposal.observe(closed)?;
                if !proposal.is_executed() {
                    return Err(GovernanceError::NotExecuted {
                        id,
                        status: proposal.status,
                    });
                }
                tracing::info!(proposal = %id, ballots = proposal.ballots_cast, "proposal executed");
            }
            ProposalStatus::Executed => {
                tracing::info!(proposal = %id, ballots = proposal.ballots_cast, "proposal executed on quorum");
            }
            status => {
                tracing::warn!(
                    proposal = %id,
                    %status,
                    ballots = proposal.ballots_cast,
                    "quorum not reached, proposal left unexecuted"
                );
            }
        }

        Ok(proposal)
    }

    async fn cast_ballot(&self, proposal: &mut Proposal, voter: Address) -> Result<(), GovernanceError> {
        let id = proposal.id;
        let accepted = self
            .governance
            .cast_vote(id, voter)
            .await
            .map_err(|source| VoteError::Ledger { id, voter, source })?;
        if !accepted {
            return Err(VoteError::Refused { id, voter }.into());
        }
        proposal.ballots_cast += 1;

        // A ballot always opens the proposal, whatever the ledger tracks.
        let observed = match self.governance.proposal_status(id).await? {
            ProposalStatus::Created => ProposalStatus::Open,
            status => status,
        };
        proposal.observe(observed)?;

        tracing::debug!(
            proposal = %id,
            %voter,
            ballot = proposal.ballots_cast,
            status = %proposal.status,
            "ballot cast"
        );
        Ok(())
    }
}

/// Submit a proposal through `governance`; see [`ProposalWorkflow::submit`].
pub async fn submit_proposal<G: GovernanceLedger + ?Sized>(
    category: ProposalCategory,
    action_data: ActionData,
    voters: &[Address],
    governance: &G,
) -> Result<Proposal, GovernanceError> {
    ProposalWorkflow::new(governance)
        .submit(category, action_data, voters)
        .await
}
