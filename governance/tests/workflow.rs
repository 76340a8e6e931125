//! Proposal workflow against in-memory ledgers.

use async_trait::async_trait;
use govgate_action::{encode, UpgradeIntent};
use govgate_governance::{submit_proposal, GovernanceError, ProposalWorkflow, VoteError};
use govgate_ledger::{AccountEnabler, GovernanceLedger, LedgerError, RegistryReader};
use govgate_nullables::{LedgerCall, NullLedger};
use govgate_types::{
    ActionData, Address, ContractCode, MemberRole, ProposalCategory, ProposalId, ProposalStatus,
};

const QT: ContractCode = ContractCode::QUOTATION;

fn addr(b: u8) -> Address {
    Address::repeat_byte(b)
}

fn board() -> Vec<Address> {
    (1..=5).map(addr).collect()
}

fn ledger(quorum: usize) -> NullLedger {
    NullLedger::new()
        .with_members(MemberRole::AdvisoryBoard, board())
        .with_contract(QT, addr(0x20))
        .with_quorum(ProposalCategory::UpgradeNonProxy, quorum)
}

fn qt_upgrade() -> ActionData {
    encode(&UpgradeIntent::single(QT, addr(0x21)).unwrap())
}

#[tokio::test]
async fn quorum_executes_the_upgrade() {
    let ledger = ledger(3);
    let voters = &board()[1..4];

    let proposal = submit_proposal(ProposalCategory::UpgradeNonProxy, qt_upgrade(), voters, &ledger)
        .await
        .unwrap();

    assert!(proposal.is_executed());
    assert_eq!(proposal.approved_after, Some(3));
    assert_eq!(proposal.voted(), voters);
    assert_eq!(ledger.registry_address(QT).await.unwrap(), addr(0x21));
}

#[tokio::test]
async fn ballots_are_cast_in_order_then_closed() {
    let ledger = ledger(2);
    let voters = vec![addr(3), addr(1), addr(2)];

    let proposal = ProposalWorkflow::new(&ledger)
        .submit(ProposalCategory::UpgradeNonProxy, qt_upgrade(), &voters)
        .await
        .unwrap();

    let id = proposal.id;
    assert_eq!(
        ledger.calls(),
        vec![
            LedgerCall::CreateProposal {
                category: ProposalCategory::UpgradeNonProxy,
                submitter: addr(3),
            },
            LedgerCall::CastVote { id, voter: addr(3) },
            LedgerCall::CastVote { id, voter: addr(1) },
            LedgerCall::CastVote { id, voter: addr(2) },
            LedgerCall::CloseProposal { id },
        ]
    );
    assert_eq!(proposal.approved_after, Some(2));
}

#[tokio::test]
async fn without_quorum_the_proposal_stays_open() {
    let ledger = ledger(3);
    let voters = &board()[1..3];

    let proposal = submit_proposal(ProposalCategory::UpgradeNonProxy, qt_upgrade(), voters, &ledger)
        .await
        .unwrap();

    assert_eq!(proposal.status, ProposalStatus::Open);
    assert_eq!(proposal.approved_after, None);
    assert!(!ledger
        .calls()
        .iter()
        .any(|c| matches!(c, LedgerCall::CloseProposal { .. })));
    assert_eq!(ledger.registry_address(QT).await.unwrap(), addr(0x20));
}

#[tokio::test]
async fn refused_ballot_aborts_remaining_voters() {
    let ledger = ledger(3);
    let outsider = addr(0x99);
    let voters = vec![addr(1), outsider, addr(2)];

    let err = submit_proposal(ProposalCategory::UpgradeNonProxy, qt_upgrade(), &voters, &ledger)
        .await
        .unwrap_err();

    match err {
        GovernanceError::Vote(VoteError::Refused { id, voter }) => {
            assert_eq!(voter, outsider);
            assert_eq!(ledger.ballots(id).unwrap(), vec![addr(1)]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ledger
        .calls()
        .contains(&LedgerCall::CastVote {
            id: ProposalId::new(0),
            voter: addr(2)
        }));
}

#[tokio::test]
async fn locked_voter_is_a_ledger_vote_error() {
    let ledger = ledger(3).requiring_unlocked_accounts();
    ledger.unlock(addr(1)).await.unwrap();

    let err = submit_proposal(
        ProposalCategory::UpgradeNonProxy,
        qt_upgrade(),
        &[addr(1), addr(2)],
        &ledger,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        GovernanceError::Vote(VoteError::Ledger {
            source: LedgerError::AccountLocked(_),
            ..
        })
    ));
    assert!(err.to_string().contains(&addr(2).to_string()));
}

#[tokio::test]
async fn empty_or_duplicate_voters_are_rejected_up_front() {
    let ledger = ledger(3);

    let err = submit_proposal(ProposalCategory::UpgradeNonProxy, qt_upgrade(), &[], &ledger)
        .await
        .unwrap_err();
    assert!(matches!(err, GovernanceError::NoVoters));

    let err = submit_proposal(
        ProposalCategory::UpgradeNonProxy,
        qt_upgrade(),
        &[addr(1), addr(2), addr(1)],
        &ledger,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GovernanceError::DuplicateVoter(v) if v == addr(1)));
    assert!(ledger.calls().is_empty());
}

/// Expires every proposal once it has `after` ballots.
struct DeadlineLedger {
    inner: NullLedger,
    after: usize,
}

#[async_trait]
impl GovernanceLedger for DeadlineLedger {
    async fn create_proposal(
        &self,
        category: ProposalCategory,
        action: &ActionData,
        submitter: Address,
    ) -> Result<ProposalId, LedgerError> {
        self.inner.create_proposal(category, action, submitter).await
    }

    async fn cast_vote(&self, id: ProposalId, voter: Address) -> Result<bool, LedgerError> {
        let accepted = self.inner.cast_vote(id, voter).await?;
        if self.inner.ballots(id)?.len() >= self.after {
            self.inner.expire(id)?;
        }
        Ok(accepted)
    }

    async fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        self.inner.proposal_status(id).await
    }

    async fn close_proposal(
        &self,
        id: ProposalId,
        closer: Address,
    ) -> Result<ProposalStatus, LedgerError> {
        self.inner.close_proposal(id, closer).await
    }
}

#[tokio::test]
async fn expired_proposal_is_returned_rejected() {
    let ledger = DeadlineLedger {
        inner: ledger(3),
        after: 1,
    };

    let proposal = submit_proposal(
        ProposalCategory::UpgradeNonProxy,
        qt_upgrade(),
        &board()[1..4],
        &ledger,
    )
    .await
    .unwrap();

    assert_eq!(proposal.status, ProposalStatus::Rejected);
    assert_eq!(proposal.ballots_cast, 1);
    assert_eq!(ledger.inner.registry_address(QT).await.unwrap(), addr(0x20));
}

/// Executes proposals in the same call that reaches quorum.
struct AutoExecutingLedger {
    inner: NullLedger,
}

#[async_trait]
impl GovernanceLedger for AutoExecutingLedger {
    async fn create_proposal(
        &self,
        category: ProposalCategory,
        action: &ActionData,
        submitter: Address,
    ) -> Result<ProposalId, LedgerError> {
        self.inner.create_proposal(category, action, submitter).await
    }

    async fn cast_vote(&self, id: ProposalId, voter: Address) -> Result<bool, LedgerError> {
        let accepted = self.inner.cast_vote(id, voter).await?;
        if self.inner.proposal_status(id).await? == ProposalStatus::Approved {
            self.inner.close_proposal(id, voter).await?;
        }
        Ok(accepted)
    }

    async fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        self.inner.proposal_status(id).await
    }

    async fn close_proposal(
        &self,
        id: ProposalId,
        closer: Address,
    ) -> Result<ProposalStatus, LedgerError> {
        self.inner.close_proposal(id, closer).await
    }
}

#[tokio::test]
async fn folded_execution_skips_late_ballots() {
    let ledger = AutoExecutingLedger { inner: ledger(2) };

    let proposal = submit_proposal(
        ProposalCategory::UpgradeNonProxy,
        qt_upgrade(),
        &board()[1..4],
        &ledger,
    )
    .await
    .unwrap();

    assert!(proposal.is_executed());
    assert_eq!(proposal.approved_after, Some(2));
    assert_eq!(proposal.ballots_cast, 2);
    assert_eq!(ledger.inner.registry_address(QT).await.unwrap(), addr(0x21));
}
