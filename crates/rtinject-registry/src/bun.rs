use std::path::{Path, PathBuf};

use rtinject_core::{Error, PlatformSpec, Result, RuntimeKind};

use crate::{executable_file_name, find_file_in, move_entry, RuntimeRule};

#[derive(Debug, Clone, Copy, Default)]
pub struct BunRule;

impl RuntimeRule for BunRule {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Bun
    }

    fn default_version(&self) -> &'static str {
        "v1.3.5"
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String> {
        let token = self.platform_token(platform)?;
        let ext = self.archive_type(platform)?;
        Ok(format!(
            "https://github.com/oven-sh/bun/releases/download/bun-{version}/bun-{token}.{ext}"
        ))
    }

    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf {
        target_dir.join(executable_file_name("bun", platform))
    }

    fn version_matches(&self, output: &str, version: &str) -> bool {
        output.contains(version.trim().trim_start_matches('v'))
    }

    fn normalize(
        &self,
        scratch: &Path,
        target: &Path,
        _version: &str,
        platform: &PlatformSpec,
    ) -> anyhow::Result<()> {
        let token = self.platform_token(platform)?;
        let name = executable_file_name("bun", platform);
        let nested = scratch.join(format!("bun-{token}"));

        let search = if nested.is_dir() {
            vec![nested, scratch.to_path_buf()]
        } else {
            vec![scratch.to_path_buf()]
        };
        let Some(source) = find_file_in(&search, &name) else {
            return Err(Error::ExecutableNotFound {
                kind: RuntimeKind::Bun,
                name,
                searched: scratch.to_path_buf(),
            }
            .into());
        };

        move_entry(&source, &target.join(&name))
    }
}
