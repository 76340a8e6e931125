//! Governance proposal categories.

use crate::{MemberRole, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of governance action a proposal carries.
///
/// The category decides how the executor decodes the action payload and which
/// member role may vote on the proposal. Discriminants are the category ids
/// registered on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCategory {
    /// Register a new proposal category.
    AddCategory,
    /// Edit an existing proposal category.
    EditCategory,
    /// Swap the implementation behind one or more proxy contracts.
    UpgradeProxy,
    /// Pause the protocol for an emergency.
    StartEmergencyPause,
    /// Replace the registry address of one or more non-proxy contracts.
    UpgradeNonProxy,
}

impl ProposalCategory {
    pub const ALL: [Self; 5] = [
        Self::AddCategory,
        Self::EditCategory,
        Self::UpgradeProxy,
        Self::StartEmergencyPause,
        Self::UpgradeNonProxy,
    ];

    /// On-chain category id.
    pub fn id(&self) -> u64 {
        match self {
            Self::AddCategory => 3,
            Self::EditCategory => 4,
            Self::UpgradeProxy => 5,
            Self::StartEmergencyPause => 6,
            Self::UpgradeNonProxy => 29,
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Human-readable name, also accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddCategory => "add_category",
            Self::EditCategory => "edit_category",
            Self::UpgradeProxy => "upgrade_proxy",
            Self::StartEmergencyPause => "start_emergency_pause",
            Self::UpgradeNonProxy => "upgrade_non_proxy",
        }
    }

    /// Whether the action payload is a `(codes, addresses)` upgrade intent.
    pub fn is_upgrade(&self) -> bool {
        matches!(self, Self::UpgradeProxy | Self::UpgradeNonProxy)
    }

    /// The member role whose members may vote on this category.
    ///
    /// Every category handled here is reserved for the advisory board.
    pub fn voting_role(&self) -> MemberRole {
        MemberRole::AdvisoryBoard
    }
}

impl fmt::Display for ProposalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.id())
    }
}

impl FromStr for ProposalCategory {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| TypesError::UnknownCategory(s.to_string()))
    }
}
