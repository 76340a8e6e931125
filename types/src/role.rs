//! Member roles held in the member registry.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role in the member registry. Voting rights on a category belong to one role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    AdvisoryBoard,
    Member,
    Owner,
}

impl MemberRole {
    /// On-chain role id.
    pub fn id(&self) -> u64 {
        match self {
            Self::AdvisoryBoard => 1,
            Self::Member => 2,
            Self::Owner => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdvisoryBoard => "advisory_board",
            Self::Member => "member",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "advisory_board" | "board" => Ok(Self::AdvisoryBoard),
            "member" => Ok(Self::Member),
            "owner" => Ok(Self::Owner),
            _ => Err(TypesError::UnknownRole(s.to_string())),
        }
    }
}
