use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    #[default]
    Node,
    Bun,
    Uv,
    #[serde(alias = "rg")]
    Ripgrep,
    Python,
}

impl RuntimeKind {
    pub const ALL: [RuntimeKind; 5] = [
        RuntimeKind::Node,
        RuntimeKind::Bun,
        RuntimeKind::Uv,
        RuntimeKind::Ripgrep,
        RuntimeKind::Python,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Bun => "bun",
            Self::Uv => "uv",
            Self::Ripgrep => "ripgrep",
            Self::Python => "python",
        }
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        match input.trim().to_ascii_lowercase().as_str() {
            "node" => Ok(Self::Node),
            "bun" => Ok(Self::Bun),
            "uv" => Ok(Self::Uv),
            "ripgrep" | "rg" => Ok(Self::Ripgrep),
            "python" => Ok(Self::Python),
            _ => Err(Error::UnknownRuntimeKind(input.to_string())),
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
