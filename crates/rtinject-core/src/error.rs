use std::path::PathBuf;

use thiserror::Error;

use crate::RuntimeKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown runtime kind '{0}'; supported: node, bun, uv, ripgrep, python")]
    UnknownRuntimeKind(String),

    #[error(
        "unsupported platform os={os} arch={arch}{}",
        .kind.map(|kind| format!(" for {kind}")).unwrap_or_default()
    )]
    UnsupportedPlatform {
        kind: Option<RuntimeKind>,
        os: String,
        arch: String,
    },

    #[error("invalid proxy URL '{url}': {reason}")]
    InvalidProxyUrl { url: String, reason: String },

    #[error("unsupported proxy protocol '{protocol}' in '{url}'; expected http or https")]
    UnsupportedProxyProtocol { url: String, protocol: String },

    #[error("download failed for {url}: {reason}")]
    DownloadFailure { url: String, reason: String },

    #[error("failed to extract {}: {detail}", .archive.display())]
    ExtractionFailure { archive: PathBuf, detail: String },

    #[error("{kind} executable '{name}' not found under {}", .searched.display())]
    ExecutableNotFound {
        kind: RuntimeKind,
        name: String,
        searched: PathBuf,
    },
}

impl Error {
    pub fn unsupported_platform(
        kind: impl Into<Option<RuntimeKind>>,
        os: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self::UnsupportedPlatform {
            kind: kind.into(),
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Configuration errors are raised before any filesystem or network work.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownRuntimeKind(_)
                | Self::UnsupportedPlatform { .. }
                | Self::InvalidProxyUrl { .. }
                | Self::UnsupportedProxyProtocol { .. }
        )
    }
}
