use std::path::{Path, PathBuf};

use rtinject_core::{ArchiveType, Error, PlatformSpec, Result, RuntimeKind};
use rtinject_resolver::ripgrep_target;

use crate::{executable_file_name, find_file_in, move_entry, sorted_subdirs, RuntimeRule};

#[derive(Debug, Clone, Copy, Default)]
pub struct RipgrepRule;

impl RuntimeRule for RipgrepRule {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::Ripgrep
    }

    fn default_version(&self) -> &'static str {
        "14.1.1"
    }

    fn download_url(&self, version: &str, platform: &PlatformSpec) -> Result<String> {
        let target = ripgrep_target(platform)?;
        Ok(format!(
            "https://github.com/BurntSushi/ripgrep/releases/download/{version}/ripgrep-{version}-{}.{}",
            target.triple, target.archive
        ))
    }

    fn archive_type(&self, platform: &PlatformSpec) -> Result<ArchiveType> {
        ripgrep_target(platform).map(|target| target.archive)
    }

    fn executable_path(&self, target_dir: &Path, platform: &PlatformSpec) -> PathBuf {
        target_dir.join(executable_file_name("rg", platform))
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
        let name = executable_file_name("rg", platform);
        let mut search = vec![scratch.to_path_buf()];
        search.extend(sorted_subdirs(scratch)?);

        let Some(source) = find_file_in(&search, &name) else {
            return Err(Error::ExecutableNotFound {
                kind: RuntimeKind::Ripgrep,
                name,
                searched: scratch.to_path_buf(),
            }
            .into());
        };
        move_entry(&source, &target.join(&name))
    }
}
