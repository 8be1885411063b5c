use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// Tokens follow the Node.js `process.platform` vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "win32",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" | "mac" | "osx" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "win32" | "windows" | "win" => Some(Self::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system and CPU architecture of the install target.
///
/// The architecture keeps the caller's spelling except for the two aliases
/// every distributor agrees on (`x86_64` and `aarch64`); per-runtime alias
/// tables handle the rest. A `-musl` suffix is split into a separate flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformSpec {
    os: Os,
    arch: String,
    musl: bool,
}

impl PlatformSpec {
    pub fn new(os: &str, arch: &str) -> Result<Self> {
        let parsed_os =
            Os::parse(os).ok_or_else(|| Error::unsupported_platform(None, os.trim(), arch.trim()))?;

        let mut arch = arch.trim().to_ascii_lowercase();
        let musl = match arch.strip_suffix("-musl") {
            Some(stripped) => {
                arch = stripped.to_string();
                true
            }
            None => false,
        };
        if arch.is_empty() {
            return Err(Error::unsupported_platform(None, parsed_os.as_str(), ""));
        }

        let arch = match arch.as_str() {
            "x86_64" | "amd64" => "x64".to_string(),
            "aarch64" => "arm64".to_string(),
            _ => arch,
        };

        Ok(Self {
            os: parsed_os,
            arch,
            musl,
        })
    }

    pub fn host() -> Result<Self> {
        let spec = Self::new(host_os_token(), host_arch_token())?;
        Ok(Self {
            musl: spec.musl || cfg!(target_env = "musl"),
            ..spec
        })
    }

    /// Fills whichever half is missing from the host.
    pub fn from_parts(os: Option<&str>, arch: Option<&str>) -> Result<Self> {
        match (os, arch) {
            (Some(os), Some(arch)) => Self::new(os, arch),
            (None, None) => Self::host(),
            (Some(os), None) => {
                let spec = Self::new(os, host_arch_token())?;
                Ok(Self {
                    musl: spec.os == Os::Linux && cfg!(target_env = "musl"),
                    ..spec
                })
            }
            (None, Some(arch)) => Self::new(host_os_token(), arch),
        }
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn is_musl(&self) -> bool {
        self.musl
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    pub fn arch_label(&self) -> String {
        if self.musl {
            format!("{}-musl", self.arch)
        } else {
            self.arch.clone()
        }
    }
}

impl fmt::Display for PlatformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch_label())
    }
}

fn host_os_token() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

fn host_arch_token() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        "powerpc64" => "ppc64",
        other => other,
    }
}
