use std::path::{Path, PathBuf};

use rtinject_core::{ArchiveType, PlatformSpec, Result, RuntimeKind};
use rtinject_resolver::{resolve, PlatformToken};

/// Per-kind knowledge of how a runtime is published upstream and how its
/// archive is laid out.
pub trait RuntimeRule: Send + Sync {
    fn kind(&self) -> RuntimeKind;

    fn default_version(&self) -> &'static str;

    fn platform_token(&self, platform: &PlatformSpec) -> Result<PlatformToken> {
        resolve(self.kind(), platform)
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String>;

    fn archive_type(&self, platform: &PlatformSpec) -> Result<ArchiveType> {
        Ok(windows_default_archive(platform))
    }

    /// Primary executable once the archive has been normalized into `target_dir`.
    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf;

    /// Additional executables shipped next to the primary one.
    fn companion_executables(
        &self,
        _target_dir: &Path,
        _platform: &PlatformSpec,
    ) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Whether every regular file under `bin/` should be made executable.
    fn has_bin_dir(&self) -> bool {
        false
    }

    fn version_args(&self) -> &'static [&'static str] {
        &["--version"]
    }

    /// Compares the output of the version command against a requested version.
    fn version_matches(&self, output: &str, version: &str) -> bool;

    /// Moves the extracted archive in `scratch` into the flat `target` layout.
    fn normalize(
        &self,
        scratch: &Path,
        target: &Path,
        version: &str,
        platform: &PlatformSpec,
    ) -> anyhow::Result<()>;

    fn supports_cleanup(&self) -> bool {
        false
    }
}

pub fn windows_default_archive(platform: &PlatformSpec) -> ArchiveType {
    if platform.is_windows() {
        ArchiveType::Zip
    } else {
        ArchiveType::TarGz
    }
}

pub fn executable_file_name(base: &str, platform: &PlatformSpec) -> String {
    if platform.is_windows() {
        format!("{base}.exe")
    } else {
        base.to_string()
    }
}
