use crate::{CheckKind, CheckOutcome, CodeCheck, VerificationReport};
use govgate_ledger::RegistryReader;
use govgate_registry::{CodeRegistry, RegistryEntry, ResolutionError};
use govgate_types::{Address, ContractCode};
use std::collections::{BTreeMap, BTreeSet};

/// A code's entry as observed at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservedEntry {
    pub entry: RegistryEntry,
    /// Implementation behind the proxy; `None` for non-proxy codes.
    pub implementation: Option<Address>,
}

impl ObservedEntry {
    /// The address an upgrade of this code changes.
    pub fn target(&self) -> Address {
        self.implementation.unwrap_or(self.entry.address)
    }
}

/// Observed entries for a set of codes, taken before an upgrade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    entries: BTreeMap<ContractCode, ObservedEntry>,
}

impl RegistrySnapshot {
    pub fn get(&self, code: ContractCode) -> Option<&ObservedEntry> {
        self.entries.get(&code)
    }

    pub fn codes(&self) -> impl Iterator<Item = ContractCode> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObservedEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks registry state against intended addresses.
pub struct UpgradeVerifier<'a, R> {
    registry: &'a CodeRegistry<R>,
}

impl<'a, R: RegistryReader> UpgradeVerifier<'a, R> {
    pub fn new(registry: &'a CodeRegistry<R>) -> Self {
        Self { registry }
    }

    async fn observe(&self, code: ContractCode) -> Result<ObservedEntry, ResolutionError> {
        let entry = self.registry.resolve(code).await?;
        let implementation = if entry.is_proxy {
            Some(self.registry.implementation(&entry).await?)
        } else {
            None
        };
        Ok(ObservedEntry {
            entry,
            implementation,
        })
    }

    /// Observe `codes` now, for comparison after an upgrade.
    pub async fn snapshot(
        &self,
        codes: impl IntoIterator<Item = ContractCode>,
    ) -> Result<RegistrySnapshot, ResolutionError> {
        let mut entries = BTreeMap::new();
        for code in codes {
            if !entries.contains_key(&code) {
                entries.insert(code, self.observe(code).await?);
            }
        }
        Ok(RegistrySnapshot { entries })
    }

    /// Re-resolve every code in `codes` and compare it with `expected`.
    ///
    /// A code with no expectation fails its check. Resolution errors abort the
    /// pass; they are not per-code failures.
    pub async fn verify(
        &self,
        codes: &BTreeSet<ContractCode>,
        expected: &BTreeMap<ContractCode, Address>,
    ) -> Result<VerificationReport, ResolutionError> {
        self.run(codes.iter().copied(), expected, None).await
    }

    /// Like [`verify`](Self::verify) over the codes of `expected`, also
    /// requiring every proxy-fronted code to keep its `baseline` proxy address.
    pub async fn verify_against(
        &self,
        baseline: &RegistrySnapshot,
        expected: &BTreeMap<ContractCode, Address>,
    ) -> Result<VerificationReport, ResolutionError> {
        self.run(expected.keys().copied(), expected, Some(baseline))
            .await
    }

    /// Check that every code in `baseline` is exactly as it was.
    pub async fn verify_unchanged(
        &self,
        baseline: &RegistrySnapshot,
    ) -> Result<VerificationReport, ResolutionError> {
        let expected = baseline
            .iter()
            .map(|observed| (observed.entry.code, observed.target()))
            .collect::<BTreeMap<_, _>>();
        self.run(baseline.codes(), &expected, Some(baseline)).await
    }

    async fn run(
        &self,
        codes: impl Iterator<Item = ContractCode>,
        expected: &BTreeMap<ContractCode, Address>,
        baseline: Option<&RegistrySnapshot>,
    ) -> Result<VerificationReport, ResolutionError> {
        let mut checks = Vec::new();
        for code in codes {
            let observed = self.observe(code).await?;
            let check = compare(
                &observed,
                expected.get(&code).copied(),
                baseline.and_then(|b| b.get(code)),
            );
            if check.passed() {
                tracing::debug!(%code, actual = %check.actual, "upgrade check passed");
            } else {
                tracing::warn!(%code, outcome = ?check.outcome, "{check}");
            }
            checks.push(check);
        }
        Ok(VerificationReport { checks })
    }
}

fn compare(
    observed: &ObservedEntry,
    expected: Option<Address>,
    baseline: Option<&ObservedEntry>,
) -> CodeCheck {
    let proxy = observed.entry.address;
    let baseline_proxy = baseline.map(|b| b.entry.address);
    let kind = if observed.entry.is_proxy {
        CheckKind::Proxy {
            proxy,
            baseline_proxy,
        }
    } else {
        CheckKind::NonProxy
    };
    let actual = observed.target();

    let outcome = match (kind, expected) {
        (
            CheckKind::Proxy {
                baseline_proxy: Some(before),
                ..
            },
            _,
        ) if before != proxy => CheckOutcome::ProxyMoved {
            before,
            after: proxy,
        },
        (_, None) => CheckOutcome::MissingExpectation,
        (_, Some(expected)) if expected == actual => CheckOutcome::Passed,
        (_, Some(_)) => CheckOutcome::Mismatch,
    };

    CodeCheck {
        code: observed.entry.code,
        kind,
        expected,
        actual,
        outcome,
    }
}
