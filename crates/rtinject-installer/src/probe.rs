use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use rtinject_core::PlatformSpec;
use rtinject_registry::RuntimeRule;
use tracing::{debug, info};

use crate::{read_marker, TargetLayout};

/// Whether `version` of the rule's runtime is already installed in `layout`.
/// Every failure is reported as not installed.
pub fn is_installed(
    rule: &dyn RuntimeRule,
    version: &str,
    platform: &PlatformSpec,
    layout: &TargetLayout,
) -> bool {
    let kind = rule.kind();
    match read_marker(layout, kind, platform) {
        Ok(Some(recorded)) if recorded == version.trim() => {}
        Ok(Some(recorded)) => {
            info!(%kind, recorded = %recorded, requested = version, "installed version differs");
            return false;
        }
        Ok(None) => {
            debug!(%kind, dir = %layout.root().display(), "no install marker");
            return false;
        }
        Err(err) => {
            debug!(%kind, error = %format!("{err:#}"), "install marker unreadable");
            return false;
        }
    }

    let executable = rule.executable_path(layout.root(), platform);
    if !executable.is_file() {
        info!(%kind, path = %executable.display(), "marker present but executable missing");
        return false;
    }

    match run_version_command(&executable, rule.version_args()) {
        Ok(output) if rule.version_matches(&output, version) => true,
        Ok(output) => {
            info!(%kind, output = %output.trim(), requested = version, "version check mismatch");
            false
        }
        Err(err) => {
            info!(%kind, error = %format!("{err:#}"), "version check failed");
            false
        }
    }
}

/// Runs `executable args...` and returns stdout, or stderr when stdout is empty.
pub fn run_version_command(executable: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new(executable)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {}", executable.display()))?;
    if !output.status.success() {
        return Err(anyhow!(
            "{} exited with status {}",
            executable.display(),
            output.status
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let text = if stdout.trim().is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        stdout
    };
    if text.trim().is_empty() {
        return Err(anyhow!("{} printed no version", executable.display()));
    }
    Ok(text)
}
