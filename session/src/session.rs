//! One upgrade session against a ledger.

use crate::{SessionConfig, SessionError, UpgradeStep, VoterSelection};
use govgate_action::encode;
use govgate_governance::{submit_proposal, Proposal};
use govgate_ledger::{AccountEnabler, GovernanceLedger, MemberRegistry, RegistryReader};
use govgate_registry::{CodeRegistry, MetadataSource};
use govgate_types::{Address, ProposalCategory};
use govgate_verification::{UpgradeVerifier, VerificationReport};

/// Everything a session needs from the ledger it runs against.
pub trait SessionLedger: RegistryReader + GovernanceLedger + MemberRegistry + AccountEnabler {}

impl<T> SessionLedger for T where T: RegistryReader + GovernanceLedger + MemberRegistry + AccountEnabler {}

/// What one applied step did.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub step: UpgradeStep,
    pub proposal: Proposal,
    /// Checked against the step's targets when executed, against the
    /// pre-proposal state otherwise.
    pub report: VerificationReport,
}

impl StepOutcome {
    pub fn executed(&self) -> bool {
        self.proposal.is_executed()
    }
}

/// Drives verified upgrades through one ledger.
pub struct UpgradeSession<L> {
    registry: CodeRegistry<L>,
    voters: VoterSelection,
    extra_accounts: Vec<Address>,
}

impl<L: SessionLedger> UpgradeSession<L> {
    pub fn new(registry: CodeRegistry<L>, voters: VoterSelection) -> Self {
        Self {
            registry,
            voters,
            extra_accounts: Vec::new(),
        }
    }

    pub fn with_extra_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.extra_accounts = accounts;
        self
    }

    /// Fetch the metadata once from `source` and open a session over `ledger`.
    pub async fn connect(
        source: &dyn MetadataSource,
        config: &SessionConfig,
        ledger: L,
    ) -> Result<Self, SessionError> {
        let registry = CodeRegistry::connect(source, config.network, ledger).await?;
        Ok(Self::new(registry, config.voters).with_extra_accounts(config.extra_accounts.clone()))
    }

    pub fn registry(&self) -> &CodeRegistry<L> {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        self.registry.reader()
    }

    /// The configured window of the voting role's current members.
    pub async fn select_voters(&self) -> Result<Vec<Address>, SessionError> {
        let VoterSelection {
            role,
            offset,
            count,
        } = self.voters;
        let members = self.ledger().members(role).await?;
        let window = offset
            .checked_add(count)
            .and_then(|end| members.get(offset..end))
            .ok_or(SessionError::NotEnoughMembers {
                role,
                offset,
                count,
                available: members.len(),
            })?;
        tracing::info!(%role, offset, count, "selected voters");
        Ok(window.to_vec())
    }

    /// Fund and then unlock each account, one at a time, in order.
    pub async fn enable_accounts(&self, accounts: &[Address]) -> Result<(), SessionError> {
        for account in accounts {
            self.ledger().fund(*account).await?;
            self.ledger().unlock(*account).await?;
            tracing::debug!(%account, "account enabled");
        }
        Ok(())
    }

    /// Select the voters and enable them along with the extra accounts.
    pub async fn prepare(&self) -> Result<Vec<Address>, SessionError> {
        let voters = self.select_voters().await?;
        let mut accounts = voters.clone();
        for extra in &self.extra_accounts {
            if !accounts.contains(extra) {
                accounts.push(*extra);
            }
        }
        self.enable_accounts(&accounts).await?;
        tracing::info!(voters = voters.len(), accounts = accounts.len(), "accounts enabled");
        Ok(voters)
    }

    /// Apply one upgrade step with the given voters and verify its effect.
    ///
    /// An executed proposal must have moved every code to its target, with
    /// proxies keeping their address. A proposal left unexecuted must have
    /// changed nothing. Either way a failed check is an error.
    pub async fn apply_step(
        &self,
        step: &UpgradeStep,
        voters: &[Address],
    ) -> Result<StepOutcome, SessionError> {
        let intent = step.intent()?;
        let wants_proxy = match step.category {
            ProposalCategory::UpgradeProxy => true,
            ProposalCategory::UpgradeNonProxy => false,
            other => return Err(SessionError::NotAnUpgrade(other)),
        };

        let verifier = UpgradeVerifier::new(&self.registry);
        let baseline = verifier.snapshot(intent.codes().iter().copied()).await?;
        for observed in baseline.iter() {
            if observed.entry.is_proxy != wants_proxy {
                return Err(SessionError::CategoryMismatch {
                    category: step.category,
                    code: observed.entry.code,
                    is_proxy: observed.entry.is_proxy,
                });
            }
        }

        let action = encode(&intent);
        tracing::info!(
            category = %step.category,
            codes = ?intent.codes(),
            payload = %action,
            "submitting upgrade"
        );
        let proposal = submit_proposal(step.category, action, voters, self.ledger()).await?;

        let report = if proposal.is_executed() {
            verifier.verify_against(&baseline, &intent.expected()).await?
        } else {
            verifier.verify_unchanged(&baseline).await?
        };
        let report = report.into_result()?;

        tracing::info!(
            proposal = %proposal.id,
            status = %proposal.status,
            checks = report.checks.len(),
            "upgrade step verified"
        );
        Ok(StepOutcome {
            step: step.clone(),
            proposal,
            report,
        })
    }

    /// Prepare the voters, then apply `steps` in order.
    ///
    /// Stops at the first step that fails or is left unexecuted.
    pub async fn run_plan(&self, steps: &[UpgradeStep]) -> Result<Vec<StepOutcome>, SessionError> {
        let voters = self.prepare().await?;
        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let outcome = self.apply_step(step, &voters).await?;
            if !outcome.executed() {
                return Err(SessionError::StepNotExecuted {
                    step: index,
                    id: outcome.proposal.id,
                    status: outcome.proposal.status,
                });
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
