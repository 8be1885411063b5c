use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformToken {
    pub value: String,
    /// Set when the resolver had no mapping and substituted its generic default.
    pub fallback: bool,
}

impl PlatformToken {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fallback: false,
        }
    }

    pub fn fallback(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            fallback: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PlatformToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
