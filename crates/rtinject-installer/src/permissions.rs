use anyhow::{Context, Result};
use rtinject_core::PlatformSpec;
use rtinject_registry::RuntimeRule;
use std::fs;
use std::path::Path;

use crate::TargetLayout;

pub const EXECUTABLE_MODE: u32 = 0o755;

/// Marks the rule's executables `rwxr-xr-x`. No-op for Windows targets and
/// on hosts without Unix permissions.
pub fn mark_executables(
    rule: &dyn RuntimeRule,
    layout: &TargetLayout,
    platform: &PlatformSpec,
) -> Result<()> {
    if platform.is_windows() {
        return Ok(());
    }

    set_executable(&rule.executable_path(layout.root(), platform))?;
    for companion in rule.companion_executables(layout.root(), platform) {
        if companion.is_file() {
            set_executable(&companion)?;
        }
    }

    let bin_dir = layout.bin_dir();
    if rule.has_bin_dir() && bin_dir.is_dir() {
        for entry in fs::read_dir(&bin_dir)
            .with_context(|| format!("failed to read {}", bin_dir.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                set_executable(&entry.path())?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
        .with_context(|| format!("failed to mark executable: {}", path.display()))
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
