//! 20-byte account and contract addresses.

use crate::TypesError;

pub use alloy_primitives::Address;

/// Parse a `0x`-prefixed (or bare) hex address.
///
/// The all-zero address parses fine; callers that treat it as "unset" must
/// check [`Address::is_zero`] themselves.
pub fn parse_address(raw: &str) -> Result<Address, TypesError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| TypesError::InvalidAddress(format!("{raw}: {e}")))
}
