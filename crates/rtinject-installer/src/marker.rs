use anyhow::{Context, Result};
use rtinject_core::{PlatformSpec, RuntimeKind};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::TargetLayout;

pub fn write_marker(
    layout: &TargetLayout,
    kind: RuntimeKind,
    platform: &PlatformSpec,
    version: &str,
) -> Result<PathBuf> {
    let path = layout.marker_path(kind, platform);
    fs::write(&path, version.as_bytes())
        .with_context(|| format!("failed to write install marker: {}", path.display()))?;
    Ok(path)
}

/// Installed version recorded for `kind` on `platform`, if any.
pub fn read_marker(
    layout: &TargetLayout,
    kind: RuntimeKind,
    platform: &PlatformSpec,
) -> Result<Option<String>> {
    let path = layout.marker_path(kind, platform);
    match fs::read_to_string(&path) {
        Ok(raw) => Ok(Some(raw.trim().to_string())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err)
            .with_context(|| format!("failed to read install marker: {}", path.display())),
    }
}

pub fn remove_marker(
    layout: &TargetLayout,
    kind: RuntimeKind,
    platform: &PlatformSpec,
) -> Result<()> {
    let path = layout.marker_path(kind, platform);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("failed to remove install marker: {}", path.display())),
    }
}
