//! Encoding and decoding of upgrade payloads.
//!
//! Layout for `n` pairs (every cell is one 32-byte word):
//!
//! ```text
//! [0]            offset of codes array      = 0x40
//! [1]            offset of addresses array  = 0x40 + 32 * (n + 1)
//! [2]            n
//! [3 .. 3+n]     codes, left-aligned
//! [3+n]          n
//! [4+n .. 4+2n]  addresses, right-aligned
//! ```

use crate::abi::{self, WordReader, WORD};
use crate::{EncodingError, UpgradeIntent};
use govgate_types::ActionData;

/// Encode an intent as the action payload of an upgrade proposal.
pub fn encode(intent: &UpgradeIntent) -> ActionData {
    let n = intent.len();
    let codes_offset = 2 * WORD;
    let addresses_offset = codes_offset + WORD * (n + 1);

    let mut out = Vec::with_capacity(WORD * (4 + 2 * n));
    out.extend_from_slice(&abi::uint_word(codes_offset as u64));
    out.extend_from_slice(&abi::uint_word(addresses_offset as u64));

    out.extend_from_slice(&abi::uint_word(n as u64));
    for code in intent.codes() {
        out.extend_from_slice(&abi::code_word(code));
    }

    out.extend_from_slice(&abi::uint_word(n as u64));
    for address in intent.new_addresses() {
        out.extend_from_slice(&abi::address_word(address));
    }

    ActionData::new(out)
}

/// Decode an upgrade payload back into its ordered pairs.
///
/// The decoded arrays go through the same checks as [`UpgradeIntent::new`].
pub fn decode(data: &[u8]) -> Result<UpgradeIntent, EncodingError> {
    let reader = WordReader::new(data);
    let codes_offset = reader.offset(0)?;
    let addresses_offset = reader.offset(1)?;

    let codes = reader.array_at(codes_offset, abi::code_from_word)?;
    let addresses = reader.array_at(addresses_offset, abi::address_from_word)?;

    UpgradeIntent::new(codes, addresses)
}
