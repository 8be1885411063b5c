use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use rtinject_core::{CleanupConfig, CleanupRules, PlatformSpec};
use tracing::{debug, warn};

const DOC_PATTERNS: &[&str] = &[
    "**/*.md",
    "**/*.markdown",
    "**/CHANGELOG*",
    "**/doc/**/*",
    "**/docs/**/*",
    "**/man/**/*",
];
const DEV_FILE_PATTERNS: &[&str] = &[
    "**/*.h",
    "**/*.hh",
    "**/*.hpp",
    "**/*.c",
    "**/*.cc",
    "**/*.gypi",
    "**/include/**/*",
];
const SOURCE_MAP_PATTERNS: &[&str] = &["**/*.map"];

const UNIX_BULK_DIRS: &[&str] = &["share", "include"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Pattern or path that could not be processed.
    pub subject: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    fn fail(&mut self, subject: impl Into<String>, reason: impl ToString) {
        let failure = CleanupFailure {
            subject: subject.into(),
            reason: reason.to_string(),
        };
        warn!(subject = %failure.subject, reason = %failure.reason, "cleanup step failed");
        self.failures.push(failure);
    }
}

/// Strips non-essential files from an installed runtime. Never fails; every
/// problem is recorded in the report.
///
/// Unix-like targets drop the `share/` and `include/` trees wholesale and
/// ignore the individual rule switches. Windows targets delete files
/// matching the enabled pattern categories.
pub fn cleanup(
    target_dir: &Path,
    platform: &PlatformSpec,
    config: &CleanupConfig,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    let Some(rules) = config.rules() else {
        return report;
    };

    if platform.is_windows() {
        for pattern in cleanup_patterns(&rules) {
            remove_matching_files(target_dir, &pattern, &mut report);
        }
    } else {
        for name in UNIX_BULK_DIRS {
            let dir = target_dir.join(name);
            if !dir.exists() {
                continue;
            }
            match fs::remove_dir_all(&dir) {
                Ok(()) => {
                    debug!(path = %dir.display(), "removed directory");
                    report.removed.push(dir);
                }
                Err(err) => report.fail(dir.display().to_string(), err),
            }
        }
    }
    report
}

/// Glob patterns, relative to the install root, for the enabled categories.
pub fn cleanup_patterns(rules: &CleanupRules) -> Vec<String> {
    let mut patterns = Vec::new();
    let categories = [
        (rules.remove_docs, DOC_PATTERNS),
        (rules.remove_dev_files, DEV_FILE_PATTERNS),
        (rules.remove_source_maps, SOURCE_MAP_PATTERNS),
    ];
    for (enabled, category) in categories {
        if enabled {
            patterns.extend(category.iter().map(|pattern| pattern.to_string()));
        }
    }
    patterns.extend(
        rules
            .custom_patterns
            .iter()
            .map(|pattern| pattern.trim())
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string),
    );
    patterns
}

fn remove_matching_files(root: &Path, pattern: &str, report: &mut CleanupReport) {
    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern.trim_start_matches(|c: char| c == '/' || c == '\\')
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let paths = match glob::glob_with(&full, options) {
        Ok(paths) => paths,
        Err(err) => {
            report.fail(pattern, err);
            return;
        }
    };

    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                report.fail(pattern, err);
                continue;
            }
        };
        let is_file = fs::symlink_metadata(&path)
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(err) => report.fail(path.display().to_string(), err),
        }
    }
}
