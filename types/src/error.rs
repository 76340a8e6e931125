//! Construction errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("contract code {code:?} must be exactly 2 bytes, got {width}")]
    InvalidCodeWidth { code: String, width: usize },

    #[error("contract code {0:?} must be ASCII alphanumeric")]
    InvalidCodeCharacter(String),

    #[error("unknown proposal category: {0}")]
    UnknownCategory(String),

    #[error("unknown member role: {0}")]
    UnknownRole(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
