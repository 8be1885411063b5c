use anyhow::{Context, Result};
use rtinject_core::{ArchiveType, PlatformSpec, RuntimeKind};
use std::fs;
use std::path::{Path, PathBuf};

/// The directory a runtime is injected into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    root: PathBuf,
}

impl TargetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn marker_path(&self, kind: RuntimeKind, platform: &PlatformSpec) -> PathBuf {
        self.root.join(marker_file_name(kind, platform))
    }

    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create target dir: {}", self.root.display()))
    }

    /// Removes every entry inside the root, keeping the root itself.
    pub fn empty(&self) -> Result<()> {
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("failed to read target dir: {}", self.root.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            } else {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

pub fn marker_file_name(kind: RuntimeKind, platform: &PlatformSpec) -> String {
    format!("{}_{}_{}", kind, platform.os(), platform.arch_label())
}

pub fn archive_file_name(kind: RuntimeKind, version: &str, archive: ArchiveType) -> String {
    format!("{kind}-{version}.{archive}")
}
