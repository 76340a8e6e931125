use crate::VerificationFailure;
use govgate_types::{Address, ContractCode};
use serde::Serialize;
use std::fmt;

/// Which address a check compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// The implementation behind `proxy` was compared.
    Proxy {
        proxy: Address,
        /// Proxy address before the upgrade, when a baseline was taken.
        baseline_proxy: Option<Address>,
    },
    /// The registry address itself was compared.
    NonProxy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    /// The observed address differs from the expected one.
    Mismatch,
    /// The code was checked but nothing was expected of it.
    MissingExpectation,
    /// A proxy-fronted code is registered under a different proxy than before.
    ProxyMoved { before: Address, after: Address },
}

/// Result of checking one code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeCheck {
    pub code: ContractCode,
    pub kind: CheckKind,
    pub expected: Option<Address>,
    /// Implementation for proxies, registry address otherwise.
    pub actual: Address,
    pub outcome: CheckOutcome,
}

impl CodeCheck {
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Passed
    }
}

impl fmt::Display for CodeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            CheckKind::Proxy { .. } => "implementation",
            CheckKind::NonProxy => "address",
        };
        match (self.outcome, self.expected) {
            (CheckOutcome::ProxyMoved { before, after }, _) => {
                write!(f, "{}: proxy moved from {before} to {after}", self.code)
            }
            (CheckOutcome::MissingExpectation, _) | (_, None) => {
                write!(f, "{}: {what} is {}, nothing expected", self.code, self.actual)
            }
            (_, Some(expected)) => write!(
                f,
                "{}: {what} expected {expected}, actual {}",
                self.code, self.actual
            ),
        }
    }
}

/// Per-code results of one verification pass, in code order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub checks: Vec<CodeCheck>,
}

impl VerificationReport {
    /// True when every check passed. An empty report passes.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CodeCheck::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CodeCheck> {
        self.checks.iter().filter(|c| !c.passed())
    }

    pub fn check(&self, code: ContractCode) -> Option<&CodeCheck> {
        self.checks.iter().find(|c| c.code == code)
    }

    pub fn into_result(self) -> Result<Self, VerificationFailure> {
        if self.passed() {
            return Ok(self);
        }
        let total = self.checks.len();
        let failures = self.checks.into_iter().filter(|c| !c.passed()).collect();
        Err(VerificationFailure { total, failures })
    }
}
