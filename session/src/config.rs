//! Session configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use govgate_action::{EncodingError, UpgradeIntent};
use govgate_registry::source::DEFAULT_METADATA_URL;
use govgate_types::{Address, ContractCode, MemberRole, NetworkId, ProposalCategory};
use govgate_utils::LogFormat;

use crate::SessionError;

/// Configuration for an upgrade session.
///
/// Can be loaded from a TOML file via [`SessionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Which section of the metadata document to use.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Where to fetch the metadata document from.
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Read the metadata document from this file instead of `metadata_url`.
    #[serde(default)]
    pub metadata_file: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Accounts enabled alongside the voters (e.g. a large token holder).
    #[serde(default)]
    pub extra_accounts: Vec<Address>,

    /// Which members vote.
    #[serde(default)]
    pub voters: VoterSelection,

    /// Settings for offline rehearsal against an in-memory ledger.
    #[serde(default)]
    pub rehearsal: RehearsalConfig,

    /// Upgrade plan, applied in order.
    #[serde(default)]
    pub steps: Vec<UpgradeStep>,
}

/// A contiguous window of one role's member list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSelection {
    #[serde(default = "default_role")]
    pub role: MemberRole,

    /// Members to skip at the start of the list.
    #[serde(default = "default_offset")]
    pub offset: usize,

    #[serde(default = "default_count")]
    pub count: usize,
}

/// One upgrade proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeStep {
    pub category: ProposalCategory,
    pub codes: Vec<ContractCode>,
    /// Paired positionally with `codes`. May be left empty for rehearsal,
    /// which deploys fresh targets.
    #[serde(default)]
    pub new_addresses: Vec<Address>,
}

impl UpgradeStep {
    pub fn new(category: ProposalCategory, codes: Vec<ContractCode>, new_addresses: Vec<Address>) -> Self {
        Self {
            category,
            codes,
            new_addresses,
        }
    }

    pub fn intent(&self) -> Result<UpgradeIntent, EncodingError> {
        UpgradeIntent::new(self.codes.clone(), self.new_addresses.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehearsalConfig {
    /// Advisory board members. When empty, `board_size` fresh accounts are used.
    #[serde(default)]
    pub board: Vec<Address>,

    #[serde(default = "default_board_size")]
    pub board_size: usize,

    /// Affirmative ballots needed for the upgrade categories.
    #[serde(default = "default_quorum")]
    pub quorum: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Mainnet
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_URL.to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_role() -> MemberRole {
    MemberRole::AdvisoryBoard
}

fn default_offset() -> usize {
    1
}

fn default_count() -> usize {
    3
}

fn default_board_size() -> usize {
    5
}

fn default_quorum() -> usize {
    3
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SessionError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            metadata_url: default_metadata_url(),
            metadata_file: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            extra_accounts: Vec::new(),
            voters: VoterSelection::default(),
            rehearsal: RehearsalConfig::default(),
            steps: Vec::new(),
        }
    }
}

impl Default for VoterSelection {
    fn default() -> Self {
        Self {
            role: default_role(),
            offset: default_offset(),
            count: default_count(),
        }
    }
}

impl Default for RehearsalConfig {
    fn default() -> Self {
        Self {
            board: Vec::new(),
            board_size: default_board_size(),
            quorum: default_quorum(),
        }
    }
}
