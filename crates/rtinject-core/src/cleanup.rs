use serde::{Deserialize, Serialize};

/// `true`, `false`, or an explicit rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanupConfig {
    Enabled(bool),
    Rules(CleanupRules),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanupRules {
    pub remove_docs: bool,
    pub remove_dev_files: bool,
    pub remove_source_maps: bool,
    pub custom_patterns: Vec<String>,
}

impl Default for CleanupRules {
    fn default() -> Self {
        Self {
            remove_docs: true,
            remove_dev_files: true,
            remove_source_maps: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl CleanupConfig {
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Rules(_) => true,
        }
    }

    /// Effective rules, or `None` when cleanup is switched off.
    pub fn rules(&self) -> Option<CleanupRules> {
        match self {
            Self::Enabled(true) => Some(CleanupRules::default()),
            Self::Enabled(false) => None,
            Self::Rules(rules) => Some(rules.clone()),
        }
    }
}

impl From<bool> for CleanupConfig {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}
