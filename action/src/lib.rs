//! Upgrade intents and the action payload a governance proposal carries.
//!
//! An upgrade proposal's action is the Ethereum ABI encoding of
//! `(bytes2[] codes, address[] newAddresses)`. The on-chain executor decodes
//! the two arrays and pairs them positionally; [`codec::decode`] does the same
//! so the in-memory ledger and tests can check what a payload actually says.

pub mod abi;
pub mod codec;
pub mod error;
pub mod intent;

pub use codec::{decode, encode};
pub use error::EncodingError;
pub use intent::UpgradeIntent;
