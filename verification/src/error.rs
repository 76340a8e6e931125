use crate::CodeCheck;
use thiserror::Error;

/// One or more codes did not end up where the upgrade intended.
#[derive(Debug, Error)]
#[error("{} of {} upgrade checks failed: {}", .failures.len(), .total, render(.failures))]
pub struct VerificationFailure {
    /// Number of codes checked.
    pub total: usize,
    pub failures: Vec<CodeCheck>,
}

fn render(failures: &[CodeCheck]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
