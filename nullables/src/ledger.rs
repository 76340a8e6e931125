//! Nullable ledger — registry, governance, member roles and accounts in memory.

use async_trait::async_trait;
use govgate_ledger::{AccountEnabler, GovernanceLedger, LedgerError, MemberRegistry, RegistryReader};
use govgate_registry::MetadataSnapshot;
use govgate_types::{
    ActionData, Address, ContractCode, MemberRole, ProposalCategory, ProposalId, ProposalStatus,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Affirmative ballots needed when no quorum was configured for a category.
pub const DEFAULT_QUORUM: usize = 3;

/// A state-changing call received by the ledger, for ordering assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    CreateProposal {
        category: ProposalCategory,
        submitter: Address,
    },
    CastVote {
        id: ProposalId,
        voter: Address,
    },
    CloseProposal {
        id: ProposalId,
    },
    Fund(Address),
    Unlock(Address),
}

struct ProposalRecord {
    category: ProposalCategory,
    action: ActionData,
    ballots: Vec<Address>,
    status: ProposalStatus,
}

#[derive(Default)]
struct LedgerState {
    registry: BTreeMap<ContractCode, Address>,
    /// proxy address → implementation address
    implementations: HashMap<Address, Address>,
    members: HashMap<MemberRole, Vec<Address>>,
    quorums: HashMap<ProposalCategory, usize>,
    proposals: Vec<ProposalRecord>,
    funded: HashSet<Address>,
    unlocked: HashSet<Address>,
    require_unlocked: bool,
    deployed: u64,
    calls: Vec<LedgerCall>,
}

impl LedgerState {
    fn proposal(&self, id: ProposalId) -> Result<&ProposalRecord, LedgerError> {
        usize::try_from(id.as_u64())
            .ok()
            .and_then(|i| self.proposals.get(i))
            .ok_or(LedgerError::UnknownProposal(id))
    }

    fn proposal_mut(&mut self, id: ProposalId) -> Result<&mut ProposalRecord, LedgerError> {
        usize::try_from(id.as_u64())
            .ok()
            .and_then(|i| self.proposals.get_mut(i))
            .ok_or(LedgerError::UnknownProposal(id))
    }

    fn is_member(&self, role: MemberRole, account: &Address) -> bool {
        self.members
            .get(&role)
            .is_some_and(|members| members.contains(account))
    }

    fn quorum(&self, category: ProposalCategory) -> usize {
        self.quorums.get(&category).copied().unwrap_or(DEFAULT_QUORUM)
    }

    fn check_unlocked(&self, account: &Address) -> Result<(), LedgerError> {
        if self.require_unlocked && !self.unlocked.contains(account) {
            return Err(LedgerError::AccountLocked(account.to_string()));
        }
        Ok(())
    }

    fn next_address(&mut self) -> Address {
        self.deployed += 1;
        let mut bytes = [0u8; 20];
        bytes[0] = 0xc0;
        bytes[12..].copy_from_slice(&self.deployed.to_be_bytes());
        Address::from(bytes)
    }

    /// Apply an approved upgrade. Every pair is checked before anything changes.
    fn execute(&mut self, category: ProposalCategory, action: &ActionData) -> Result<(), LedgerError> {
        let intent = govgate_action::decode(action.as_bytes())
            .map_err(|e| LedgerError::Reverted(format!("undecodable action: {e}")))?;

        match category {
            ProposalCategory::UpgradeProxy => {
                let mut proxies = Vec::with_capacity(intent.len());
                for (code, implementation) in intent.pairs() {
                    let proxy = self
                        .registry
                        .get(&code)
                        .copied()
                        .filter(|proxy| self.implementations.contains_key(proxy))
                        .ok_or_else(|| LedgerError::Reverted(format!("{code} is not a proxy")))?;
                    proxies.push((proxy, implementation));
                }
                for (proxy, implementation) in proxies {
                    self.implementations.insert(proxy, implementation);
                }
            }
            ProposalCategory::UpgradeNonProxy => {
                for code in intent.codes() {
                    match self.registry.get(code) {
                        None => {
                            return Err(LedgerError::Reverted(format!("{code} is not registered")))
                        }
                        Some(current) if self.implementations.contains_key(current) => {
                            return Err(LedgerError::Reverted(format!(
                                "{code} is proxy-fronted"
                            )))
                        }
                        Some(_) => {}
                    }
                }
                self.registry.extend(intent.pairs());
            }
            other => return Err(LedgerError::Unsupported(other.as_str().to_string())),
        }
        Ok(())
    }
}

/// An in-memory ledger implementing every collaborator trait.
///
/// Quorum is a per-category count of affirmative ballots from members of the
/// category's voting role. Proposals are executed only when closed after
/// reaching quorum.
pub struct NullLedger {
    state: Mutex<LedgerState>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Seed the registry from a metadata snapshot.
    ///
    /// Proxy-fronted codes get a freshly deployed implementation behind their
    /// published address.
    pub fn from_snapshot(snapshot: &MetadataSnapshot) -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.state();
            for meta in snapshot.codes() {
                state.registry.insert(meta.code, meta.published_address);
                if meta.is_proxy {
                    let implementation = state.next_address();
                    state
                        .implementations
                        .insert(meta.published_address, implementation);
                }
            }
        }
        ledger
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a non-proxy contract.
    pub fn with_contract(self, code: ContractCode, address: Address) -> Self {
        self.state().registry.insert(code, address);
        self
    }

    /// Register a proxy-fronted contract.
    pub fn with_proxy(self, code: ContractCode, proxy: Address, implementation: Address) -> Self {
        {
            let mut state = self.state();
            state.registry.insert(code, proxy);
            state.implementations.insert(proxy, implementation);
        }
        self
    }

    pub fn with_members(self, role: MemberRole, members: Vec<Address>) -> Self {
        self.state().members.insert(role, members);
        self
    }

    pub fn with_quorum(self, category: ProposalCategory, quorum: usize) -> Self {
        self.state().quorums.insert(category, quorum);
        self
    }

    /// Refuse transactions from accounts that were not unlocked first.
    pub fn requiring_unlocked_accounts(self) -> Self {
        self.state().require_unlocked = true;
        self
    }

    /// A fresh contract address, as if a new contract had been deployed.
    pub fn deploy(&self) -> Address {
        self.state().next_address()
    }

    /// The voting deadline of `id` passed: Created or Open proposals become Rejected.
    pub fn expire(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        let mut state = self.state();
        let record = state.proposal_mut(id)?;
        if matches!(record.status, ProposalStatus::Created | ProposalStatus::Open) {
            record.status = ProposalStatus::Rejected;
            tracing::debug!(proposal = %id, "voting deadline passed without quorum");
        }
        Ok(record.status)
    }

    /// Point `code` somewhere else without a proposal, as an outside actor could.
    pub fn set_registry_address(&self, code: ContractCode, address: Address) {
        self.state().registry.insert(code, address);
    }

    /// State-changing calls received so far, in order.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state().calls.clone()
    }

    /// Accepted ballots on `id`, in order.
    pub fn ballots(&self, id: ProposalId) -> Result<Vec<Address>, LedgerError> {
        Ok(self.state().proposal(id)?.ballots.clone())
    }

    pub fn proposal_count(&self) -> usize {
        self.state().proposals.len()
    }

    pub fn is_funded(&self, account: &Address) -> bool {
        self.state().funded.contains(account)
    }

    pub fn is_unlocked(&self, account: &Address) -> bool {
        self.state().unlocked.contains(account)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryReader for NullLedger {
    async fn registry_address(&self, code: ContractCode) -> Result<Address, LedgerError> {
        Ok(self
            .state()
            .registry
            .get(&code)
            .copied()
            .unwrap_or(Address::ZERO))
    }

    async fn proxy_implementation(&self, proxy: Address) -> Result<Address, LedgerError> {
        self.state()
            .implementations
            .get(&proxy)
            .copied()
            .ok_or_else(|| LedgerError::Reverted(format!("{proxy} is not a proxy")))
    }
}

#[async_trait]
impl GovernanceLedger for NullLedger {
    async fn create_proposal(
        &self,
        category: ProposalCategory,
        action: &ActionData,
        submitter: Address,
    ) -> Result<ProposalId, LedgerError> {
        let mut state = self.state();
        state.calls.push(LedgerCall::CreateProposal {
            category,
            submitter,
        });
        state.check_unlocked(&submitter)?;
        if !state.is_member(category.voting_role(), &submitter) {
            return Err(LedgerError::Reverted(format!(
                "{submitter} may not submit {category} proposals"
            )));
        }

        let id = ProposalId::new(state.proposals.len() as u64);
        state.proposals.push(ProposalRecord {
            category,
            action: action.clone(),
            ballots: Vec::new(),
            status: ProposalStatus::Created,
        });
        Ok(id)
    }

    async fn cast_vote(&self, id: ProposalId, voter: Address) -> Result<bool, LedgerError> {
        let mut state = self.state();
        state.calls.push(LedgerCall::CastVote { id, voter });
        state.check_unlocked(&voter)?;

        let (category, status) = {
            let record = state.proposal(id)?;
            (record.category, record.status)
        };
        if status.is_terminal() || !state.is_member(category.voting_role(), &voter) {
            return Ok(false);
        }
        let quorum = state.quorum(category);

        let record = state.proposal_mut(id)?;
        if record.ballots.contains(&voter) {
            return Ok(false);
        }
        record.ballots.push(voter);
        record.status = if record.ballots.len() >= quorum {
            ProposalStatus::Approved
        } else {
            ProposalStatus::Open
        };
        Ok(true)
    }

    async fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        Ok(self.state().proposal(id)?.status)
    }

    async fn close_proposal(
        &self,
        id: ProposalId,
        closer: Address,
    ) -> Result<ProposalStatus, LedgerError> {
        let mut state = self.state();
        state.calls.push(LedgerCall::CloseProposal { id });
        state.check_unlocked(&closer)?;

        let (category, action, status) = {
            let record = state.proposal(id)?;
            (record.category, record.action.clone(), record.status)
        };
        if status != ProposalStatus::Approved {
            return Ok(status);
        }

        state.execute(category, &action)?;
        let record = state.proposal_mut(id)?;
        record.status = ProposalStatus::Executed;
        Ok(record.status)
    }
}

#[async_trait]
impl MemberRegistry for NullLedger {
    async fn members(&self, role: MemberRole) -> Result<Vec<Address>, LedgerError> {
        Ok(self.state().members.get(&role).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AccountEnabler for NullLedger {
    async fn fund(&self, account: Address) -> Result<(), LedgerError> {
        let mut state = self.state();
        state.calls.push(LedgerCall::Fund(account));
        state.funded.insert(account);
        Ok(())
    }

    async fn unlock(&self, account: Address) -> Result<(), LedgerError> {
        let mut state = self.state();
        state.calls.push(LedgerCall::Unlock(account));
        state.unlocked.insert(account);
        Ok(())
    }
}
