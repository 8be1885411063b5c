use std::path::{Path, PathBuf};

use rtinject_core::{Error, PlatformSpec, Result, RuntimeKind};
use tracing::{info, warn};

use crate::{executable_file_name, find_file_in, move_entry, sorted_subdirs, RuntimeRule};

#[derive(Debug, Clone, Copy, Default)]
pub struct UvRule;

impl RuntimeRule for UvRule {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Uv
    }

    fn default_version(&self) -> &'static str {
        "0.9.18"
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String> {
        let token = self.platform_token(platform)?;
        if token.fallback {
            warn!(
                platform = %platform,
                token = %token,
                "downloading generic uv build for unmapped platform"
            );
        }
        let ext = self.archive_type(platform)?;
        Ok(format!(
            "https://github.com/astral-sh/uv/releases/download/{version}/uv-{token}.{ext}"
        ))
    }

    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf {
        target_dir.join(executable_file_name("uv", platform))
    }

    fn companion_executables(&self, target_dir: &Path, platform: &PlatformSpec) -> Vec<PathBuf> {
        vec![target_dir.join(executable_file_name("uvx", platform))]
    }

    fn version_matches(&self, output: &str, version: &str) -> bool {
        output.contains(version.trim())
    }

    fn normalize(
        &self,
        scratch: &Path,
        target: &Path,
        _version: &str,
        platform: &PlatformSpec,
    ) -> anyhow::Result<()> {
        // Releases either put both binaries at the root or inside one
        // `uv-{triple}` directory.
        let mut search = vec![scratch.to_path_buf()];
        if let Some(first) = sorted_subdirs(scratch)?.into_iter().next() {
            search.push(first);
        }

        let uv_name = executable_file_name("uv", platform);
        let Some(uv) = find_file_in(&search, &uv_name) else {
            return Err(Error::ExecutableNotFound {
                kind: RuntimeKind::Uv,
                name: uv_name,
                searched: scratch.to_path_buf(),
            }
            .into());
        };
        move_entry(&uv, &target.join(&uv_name))?;

        let uvx_name = executable_file_name("uvx", platform);
        match find_file_in(&search, &uvx_name) {
            Some(uvx) => move_entry(&uvx, &target.join(&uvx_name))?,
            None => info!(name = %uvx_name, "uv archive has no uvx executable; skipping"),
        }
        Ok(())
    }
}
