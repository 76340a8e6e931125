use govgate_types::{ContractCode, TypesError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("upgrade intent must name at least one contract")]
    Empty,

    #[error("upgrade intent has {codes} codes but {addresses} addresses")]
    LengthMismatch { codes: usize, addresses: usize },

    #[error("contract code {0} appears more than once in the intent")]
    DuplicateCode(ContractCode),

    #[error("new address for {0} is the zero address")]
    ZeroAddress(ContractCode),

    #[error("payload truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("offset {0} points outside the payload")]
    InvalidOffset(usize),

    #[error("non-zero padding in word at byte {0}")]
    NonZeroPadding(usize),

    #[error("integer at byte {0} does not fit in 64 bits")]
    ValueOverflow(usize),

    #[error("invalid contract code in payload: {0}")]
    InvalidCode(#[from] TypesError),
}
