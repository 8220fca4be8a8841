//! Upstream provider (subscription) model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// An upstream registry an application may subscribe to.
///
/// A subscription decides whether a provider may be called at all;
/// scopes decide which fields of its response are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Dgfip,
    Cnaf,
    PoleEmploi,
    Mesri,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Dgfip,
        Provider::Cnaf,
        Provider::PoleEmploi,
        Provider::Mesri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Dgfip => "DGFIP",
            Provider::Cnaf => "CNAF",
            Provider::PoleEmploi => "POLE_EMPLOI",
            Provider::Mesri => "MESRI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DGFIP" => Ok(Provider::Dgfip),
            "CNAF" => Ok(Provider::Cnaf),
            "POLE_EMPLOI" => Ok(Provider::PoleEmploi),
            "MESRI" => Ok(Provider::Mesri),
            other => Err(GatewayError::validation(format!("unknown provider: {other}"))),
        }
    }
}
