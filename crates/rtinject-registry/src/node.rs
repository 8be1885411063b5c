use std::path::{Path, PathBuf};

use anyhow::Context;
use rtinject_core::{Error, PlatformSpec, Result, RuntimeKind};
use tracing::debug;

use crate::{move_dir_contents, RuntimeRule};

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeRule;

impl RuntimeRule for NodeRule {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Node
    }

    fn default_version(&self) -> &'static str {
        "v24.12.0"
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String> {
        let token = self.platform_token(platform)?;
        let ext = self.archive_type(platform)?;
        Ok(format!(
            "https://nodejs.org/dist/{version}/node-{version}-{token}.{ext}"
        ))
    }

    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf {
        if platform.is_windows() {
            target_dir.join("node.exe")
        } else {
            target_dir.join("bin").join("node")
        }
    }

    fn has_bin_dir(&self) -> bool {
        true
    }

    fn version_args(&self) -> &'static [&'static str] {
        &["-v"]
    }

    fn version_matches(&self, output: &str, version: &str) -> bool {
        output.trim() == version.trim()
    }

    fn normalize(
        &self,
        scratch: &Path,
        target: &Path,
        version: &str,
        platform: &PlatformSpec,
    ) -> anyhow::Result<()> {
        let token = self.platform_token(platform)?;
        let nested_name = format!("node-{version}-{token}");
        let nested = scratch.join(&nested_name);
        if !nested.is_dir() {
            return Err(Error::ExecutableNotFound {
                kind: RuntimeKind::Node,
                name: nested_name,
                searched: scratch.to_path_buf(),
            }
            .into());
        }

        debug!(from = %nested.display(), to = %target.display(), "moving node distribution");
        move_dir_contents(&nested, target)
            .with_context(|| format!("failed to normalize node archive {}", nested.display()))
    }

    fn supports_cleanup(&self) -> bool {
        true
    }
}
