use std::path::{Path, PathBuf};

use anyhow::Context;
use rtinject_core::{ArchiveType, Error, PlatformSpec, Result, RuntimeKind};
use rtinject_resolver::{python_platform, split_python_version};

use crate::{move_dir_contents, RuntimeRule};

pub const PYTHON_DEFAULT_RELEASE_DATE: &str = "20241219";

/// python-build-standalone `install_only` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonRule;

impl RuntimeRule for PythonRule {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Python
    }

    fn default_version(&self) -> &'static str {
        "3.12.8+20241219"
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String> {
        let token = python_platform(platform)?;
        let version = split_python_version(version, PYTHON_DEFAULT_RELEASE_DATE);
        Ok(format!(
            "https://github.com/astral-sh/python-build-standalone/releases/download/{date}/cpython-{semver}%2B{date}-{token}-install_only.tar.gz",
            date = version.release_date,
            semver = version.semver,
        ))
    }

    fn archive_type(&self, _platform: &PlatformSpec) -> Result<ArchiveType> {
        Ok(ArchiveType::TarGz)
    }

    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf {
        if platform.is_windows() {
            target_dir.join("python.exe")
        } else {
            target_dir.join("bin").join("python3")
        }
    }

    fn has_bin_dir(&self) -> bool {
        true
    }

    fn version_matches(&self, output: &str, version: &str) -> bool {
        let version = split_python_version(version.trim(), PYTHON_DEFAULT_RELEASE_DATE);
        output.contains(&version.semver)
    }

    fn normalize(
        &self,
        scratch: &Path,
        target: &Path,
        _version: &str,
        _platform: &PlatformSpec,
    ) -> anyhow::Result<()> {
        let nested = scratch.join("python");
        if !nested.is_dir() {
            return Err(Error::ExecutableNotFound {
                kind: RuntimeKind::Python,
                name: "python".to_string(),
                searched: scratch.to_path_buf(),
            }
            .into());
        }
        move_dir_contents(&nested, target)
            .with_context(|| format!("failed to normalize python archive {}", nested.display()))
    }
}
