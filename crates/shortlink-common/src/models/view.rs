//! View mode: which listing the console shows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normal short-link listing vs. recycle-bin listing. Client-side only; the
/// backend never sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Normal,
    Recycle,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Recycle => "recycle",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "recycle" => Ok(Self::Recycle),
            other => Err(format!("unknown view mode '{other}' (expected normal or recycle)")),
        }
    }
}
