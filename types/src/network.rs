//! Network identifier.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which deployment's section of the metadata document to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production deployment.
    Mainnet,
    /// The public test deployment.
    Kovan,
    /// A local development deployment.
    Localhost,
}

impl NetworkId {
    /// Key of this network in the metadata document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Kovan => "kovan",
            Self::Localhost => "localhost",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "live" => Ok(Self::Mainnet),
            "kovan" | "test" => Ok(Self::Kovan),
            "localhost" | "dev" => Ok(Self::Localhost),
            _ => Err(TypesError::UnknownNetwork(s.to_string())),
        }
    }
}
