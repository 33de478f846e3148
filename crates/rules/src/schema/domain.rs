//! Notable security domain: the closed set of review queues a notable event
//! may be filed under.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Security domain of a notable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotableDomain {
    Access,
    Audit,
    Endpoint,
    Identity,
    Network,
    Threat,
}

impl NotableDomain {
    /// Every accepted value, in the spelling authors write.
    pub const ALL: [&'static str; 6] = ["access", "audit", "endpoint", "identity", "network", "threat"];

    /// Category used in a stanza header when no enabled notable names one.
    pub const DEFAULT: NotableDomain = NotableDomain::Threat;

    pub fn as_str(&self) -> &'static str {
        match self {
            NotableDomain::Access => "access",
            NotableDomain::Audit => "audit",
            NotableDomain::Endpoint => "endpoint",
            NotableDomain::Identity => "identity",
            NotableDomain::Network => "network",
            NotableDomain::Threat => "threat",
        }
    }

    /// Title-cased label used in stanza headers (`threat` -> `Threat`).
    pub fn title(&self) -> &'static str {
        match self {
            NotableDomain::Access => "Access",
            NotableDomain::Audit => "Audit",
            NotableDomain::Endpoint => "Endpoint",
            NotableDomain::Identity => "Identity",
            NotableDomain::Network => "Network",
            NotableDomain::Threat => "Threat",
        }
    }
}

impl fmt::Display for NotableDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotableDomain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "access" => Ok(NotableDomain::Access),
            "audit" => Ok(NotableDomain::Audit),
            "endpoint" => Ok(NotableDomain::Endpoint),
            "identity" => Ok(NotableDomain::Identity),
            "network" => Ok(NotableDomain::Network),
            "threat" => Ok(NotableDomain::Threat),
            other => Err(format!("unknown notable domain: '{}'", other)),
        }
    }
}
