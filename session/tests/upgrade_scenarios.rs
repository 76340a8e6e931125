//! End-to-end upgrade scenarios against the in-memory ledger.

use std::sync::Arc;

use govgate_ledger::RegistryReader;
use govgate_nullables::{LedgerCall, NullLedger, StaticMetadataSource};
use govgate_registry::{ContractMetadata, MetadataDocument, MetadataSnapshot};
use govgate_session::{SessionConfig, SessionError, UpgradeSession, UpgradeStep, VoterSelection};
use govgate_types::{
    Address, ContractCode, MemberRole, NetworkId, ProposalCategory, ProposalStatus,
};
use govgate_verification::CheckKind;

const IC: ContractCode = ContractCode::INCIDENTS;
const QT: ContractCode = ContractCode::QUOTATION;

fn addr(b: u8) -> Address {
    Address::repeat_byte(b)
}

fn board() -> Vec<Address> {
    (0xa1..=0xa5).map(addr).collect()
}

fn document() -> MetadataDocument {
    MetadataDocument::single(
        NetworkId::Mainnet,
        vec![
            ContractMetadata::new("IC", addr(0x10), true),
            ContractMetadata::new("QT", addr(0x20), false),
            ContractMetadata::new("NXMASTER", addr(0x30), false),
        ],
    )
}

struct Harness {
    ledger: Arc<NullLedger>,
    source: StaticMetadataSource,
}

impl Harness {
    fn new(quorum: usize) -> Self {
        let snapshot = MetadataSnapshot::from_document(&document(), NetworkId::Mainnet).unwrap();
        let ledger = NullLedger::from_snapshot(&snapshot)
            .with_members(MemberRole::AdvisoryBoard, board())
            .with_quorum(ProposalCategory::UpgradeProxy, quorum)
            .with_quorum(ProposalCategory::UpgradeNonProxy, quorum)
            .requiring_unlocked_accounts();
        Self {
            ledger: Arc::new(ledger),
            source: StaticMetadataSource::new(document()),
        }
    }

    async fn session(&self, config: &SessionConfig) -> UpgradeSession<Arc<NullLedger>> {
        UpgradeSession::connect(&self.source, config, Arc::clone(&self.ledger))
            .await
            .unwrap()
    }
}

fn config(count: usize) -> SessionConfig {
    SessionConfig {
        voters: VoterSelection {
            count,
            ..VoterSelection::default()
        },
        ..SessionConfig::default()
    }
}

#[tokio::test]
async fn proxy_upgrade_swaps_implementation_behind_same_proxy() {
    let harness = Harness::new(3);
    let session = harness.session(&config(3)).await;
    let old_implementation = harness.ledger.proxy_implementation(addr(0x10)).await.unwrap();
    let target = harness.ledger.deploy();

    let outcomes = session
        .run_plan(&[UpgradeStep::new(ProposalCategory::UpgradeProxy, vec![IC], vec![target])])
        .await
        .unwrap();

    let outcome = &outcomes[0];
    assert!(outcome.executed());
    assert_eq!(outcome.proposal.status, ProposalStatus::Executed);
    assert_eq!(outcome.proposal.voted(), &board()[1..4]);

    let check = outcome.report.check(IC).unwrap();
    assert_eq!(
        check.kind,
        CheckKind::Proxy {
            proxy: addr(0x10),
            baseline_proxy: Some(addr(0x10))
        }
    );
    assert_eq!(check.actual, target);

    assert_eq!(harness.ledger.registry_address(IC).await.unwrap(), addr(0x10));
    let implementation = harness.ledger.proxy_implementation(addr(0x10)).await.unwrap();
    assert_eq!(implementation, target);
    assert_ne!(implementation, old_implementation);
}

#[tokio::test]
async fn non_proxy_upgrade_replaces_registry_address() {
    let harness = Harness::new(3);
    let session = harness.session(&config(3)).await;
    let target = harness.ledger.deploy();

    let outcomes = session
        .run_plan(&[UpgradeStep::new(ProposalCategory::UpgradeNonProxy, vec![QT], vec![target])])
        .await
        .unwrap();

    assert!(outcomes[0].executed());
    assert_eq!(outcomes[0].report.check(QT).unwrap().kind, CheckKind::NonProxy);
    assert_eq!(harness.ledger.registry_address(QT).await.unwrap(), target);
    assert_eq!(session.registry().resolve(QT).await.unwrap().address, target);
}

#[tokio::test]
async fn insufficient_voters_leave_registry_untouched() {
    let harness = Harness::new(3);
    let session = harness.session(&config(1)).await;
    let target = harness.ledger.deploy();
    let step = UpgradeStep::new(ProposalCategory::UpgradeNonProxy, vec![QT], vec![target]);

    let voters = session.prepare().await.unwrap();
    assert_eq!(voters, vec![board()[1]]);
    let outcome = session.apply_step(&step, &voters).await.unwrap();
    assert!(!outcome.executed());
    assert_eq!(outcome.proposal.status, ProposalStatus::Open);
    assert!(outcome.report.passed());
    assert_eq!(outcome.report.check(QT).unwrap().actual, addr(0x20));
    assert_eq!(harness.ledger.registry_address(QT).await.unwrap(), addr(0x20));

    let err = session.run_plan(&[step]).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::StepNotExecuted {
            step: 0,
            status: ProposalStatus::Open,
            ..
        }
    ));
}

#[tokio::test]
async fn late_ballots_are_still_cast_after_quorum() {
    let harness = Harness::new(2);
    let session = harness.session(&config(3)).await;
    let target = harness.ledger.deploy();

    let outcomes = session
        .run_plan(&[UpgradeStep::new(ProposalCategory::UpgradeNonProxy, vec![QT], vec![target])])
        .await
        .unwrap();

    let proposal = &outcomes[0].proposal;
    assert_eq!(proposal.approved_after, Some(2));
    assert_eq!(proposal.ballots_cast, 3);
    assert_eq!(harness.ledger.ballots(proposal.id).unwrap(), board()[1..4].to_vec());
}

#[tokio::test]
async fn plan_runs_in_order_and_fetches_metadata_once() {
    let harness = Harness::new(3);
    let session = harness.session(&config(3)).await;
    let ic_target = harness.ledger.deploy();
    let qt_target = harness.ledger.deploy();

    let outcomes = session
        .run_plan(&[
            UpgradeStep::new(ProposalCategory::UpgradeProxy, vec![IC], vec![ic_target]),
            UpgradeStep::new(ProposalCategory::UpgradeNonProxy, vec![QT], vec![qt_target]),
        ])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].proposal.id < outcomes[1].proposal.id);
    assert_eq!(harness.source.fetch_count(), 1);
    assert_eq!(session.registry().address_by_name("NXMASTER").unwrap(), addr(0x30));
}

#[tokio::test]
async fn accounts_are_enabled_before_any_proposal() {
    let harness = Harness::new(3);
    let extra = addr(0xee);
    let session = harness
        .session(&SessionConfig {
            extra_accounts: vec![extra],
            ..config(3)
        })
        .await;
    let target = harness.ledger.deploy();

    session
        .run_plan(&[UpgradeStep::new(ProposalCategory::UpgradeProxy, vec![IC], vec![target])])
        .await
        .unwrap();

    let voters = &board()[1..4];
    let mut expected = Vec::new();
    for account in voters.iter().chain([&extra]) {
        expected.push(LedgerCall::Fund(*account));
        expected.push(LedgerCall::Unlock(*account));
    }
    expected.push(LedgerCall::CreateProposal {
        category: ProposalCategory::UpgradeProxy,
        submitter: voters[0],
    });
    let calls = harness.ledger.calls();
    assert_eq!(&calls[..expected.len()], expected.as_slice());

    let votes: Vec<Address> = calls
        .iter()
        .filter_map(|call| match call {
            LedgerCall::CastVote { voter, .. } => Some(*voter),
            _ => None,
        })
        .collect();
    assert_eq!(votes, voters);
    assert!(matches!(calls.last(), Some(LedgerCall::CloseProposal { .. })));
    assert!(harness.ledger.is_unlocked(&extra));
}

#[tokio::test]
async fn selecting_more_members_than_exist_fails() {
    let harness = Harness::new(3);
    let session = harness.session(&config(5)).await;

    let err = session.run_plan(&[]).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotEnoughMembers {
            available: 5,
            offset: 1,
            count: 5,
            ..
        }
    ));
    assert!(harness.ledger.calls().is_empty());
}

#[tokio::test]
async fn wrong_category_is_rejected_before_submission() {
    let harness = Harness::new(3);
    let session = harness.session(&config(3)).await;
    let target = harness.ledger.deploy();

    let err = session
        .run_plan(&[UpgradeStep::new(ProposalCategory::UpgradeProxy, vec![QT], vec![target])])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::CategoryMismatch {
            code: QT,
            is_proxy: false,
            ..
        }
    ));
    assert_eq!(harness.ledger.proposal_count(), 0);
}

#[tokio::test]
async fn unknown_code_is_a_resolution_error() {
    let harness = Harness::new(3);
    let session = harness.session(&config(3)).await;
    let target = harness.ledger.deploy();

    let err = session
        .run_plan(&[UpgradeStep::new(
            ProposalCategory::UpgradeNonProxy,
            vec![ContractCode::GATEWAY],
            vec![target],
        )])
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Resolution(_)));
}
