use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rtinject_core::{CleanupConfig, RuntimeKind};
use rtinject_installer::InjectOptions;
use rtinject_net::ProxyOptions;
use serde::Deserialize;

use crate::TargetArgs;

/// Contents of a `--config` JSON file. Flags override every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub kind: Option<RuntimeKind>,
    pub version: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    #[serde(alias = "targetDir")]
    pub dir: Option<PathBuf>,
    pub cleanup: Option<CleanupConfig>,
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirRequirement {
    Required,
    Optional,
}

pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_file_config(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

pub(crate) fn parse_file_config(raw: &str) -> Result<FileConfig> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn build_inject_options(
    args: &TargetArgs,
    requirement: DirRequirement,
) -> Result<InjectOptions> {
    let file = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    merge_options(args, file, requirement)
}

pub(crate) fn merge_options(
    args: &TargetArgs,
    file: FileConfig,
    requirement: DirRequirement,
) -> Result<InjectOptions> {
    let target_dir = match (args.dir.clone().or(file.dir), requirement) {
        (Some(dir), _) => dir,
        (None, DirRequirement::Optional) => PathBuf::new(),
        (None, DirRequirement::Required) => {
            bail!("missing target directory; pass --dir or set \"dir\" in the config file")
        }
    };

    Ok(InjectOptions {
        kind: args.kind.or(file.kind).unwrap_or_default(),
        version: args.version.clone().or(file.version),
        os: args.os.clone().or(file.os),
        arch: args.arch.clone().or(file.arch),
        target_dir,
        cleanup: merge_cleanup(args, file.cleanup.unwrap_or_default()),
        proxy: ProxyOptions {
            http_proxy: args.http_proxy.clone().or(file.http_proxy),
            https_proxy: args.https_proxy.clone().or(file.https_proxy),
            no_proxy: args.no_proxy.clone().or(file.no_proxy),
        },
    })
}

fn merge_cleanup(args: &TargetArgs, base: CleanupConfig) -> CleanupConfig {
    if args.no_cleanup {
        return CleanupConfig::Enabled(false);
    }

    let touches_rules = args.no_remove_docs
        || args.no_remove_dev_files
        || args.no_remove_source_maps
        || !args.cleanup_patterns.is_empty();
    if !touches_rules {
        return base;
    }

    let mut rules = base.rules().unwrap_or_default();
    if args.no_remove_docs {
        rules.remove_docs = false;
    }
    if args.no_remove_dev_files {
        rules.remove_dev_files = false;
    }
    if args.no_remove_source_maps {
        rules.remove_source_maps = false;
    }
    rules
        .custom_patterns
        .extend(args.cleanup_patterns.iter().cloned());
    CleanupConfig::Rules(rules)
}
