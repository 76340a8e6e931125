//! Contract codes — the 2-byte identifiers the registry is keyed by.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated 2-byte contract code, e.g. `IC` or `QT`.
///
/// Codes are restricted to ASCII alphanumerics so they always render as text
/// and map one-to-one onto the `bytes2` value the on-chain registry uses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractCode([u8; 2]);

impl ContractCode {
    /// Width of a code in bytes.
    pub const WIDTH: usize = 2;

    pub const GOVERNANCE: Self = Self(*b"GV");
    pub const MEMBER_ROLES: Self = Self(*b"MR");
    pub const INCIDENTS: Self = Self(*b"IC");
    pub const QUOTATION: Self = Self(*b"QT");
    pub const QUOTATION_DATA: Self = Self(*b"QD");
    pub const TOKEN_CONTROLLER: Self = Self(*b"TC");
    pub const TOKEN_FUNCTIONS: Self = Self(*b"TF");
    pub const POOL: Self = Self(*b"P1");
    pub const CLAIMS_REWARD: Self = Self(*b"CR");
    pub const GATEWAY: Self = Self(*b"GW");

    /// Build a code from raw bytes, rejecting anything that is not ASCII alphanumeric.
    pub fn new(bytes: [u8; 2]) -> Result<Self, TypesError> {
        if bytes.iter().all(u8::is_ascii_alphanumeric) {
            Ok(Self(bytes))
        } else {
            Err(TypesError::InvalidCodeCharacter(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        }
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII, so this never falls back.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for ContractCode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 2] = s
            .as_bytes()
            .try_into()
            .map_err(|_| TypesError::InvalidCodeWidth {
                code: s.to_string(),
                width: s.len(),
            })?;
        Self::new(bytes)
    }
}

impl TryFrom<String> for ContractCode {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ContractCode> for String {
    fn from(code: ContractCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Debug for ContractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractCode({})", self.as_str())
    }
}

impl fmt::Display for ContractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
