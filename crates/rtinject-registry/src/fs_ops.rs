use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Renames `src` to `dst`, falling back to copy + remove when the rename
/// crosses filesystems.
pub fn move_entry(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    let metadata = fs::symlink_metadata(src)
        .with_context(|| format!("failed to stat {}", src.display()))?;
    if metadata.is_dir() {
        copy_dir_recursive(src, dst)?;
        fs::remove_dir_all(src)
            .with_context(|| format!("failed to remove moved directory {}", src.display()))?;
    } else {
        copy_entry(src, dst, &metadata)?;
        fs::remove_file(src)
            .with_context(|| format!("failed to remove moved file {}", src.display()))?;
    }
    Ok(())
}

/// Moves every entry of `src_dir` into `dst_dir`, in name order.
pub fn move_dir_contents(src_dir: &Path, dst_dir: &Path) -> Result<()> {
    fs::create_dir_all(dst_dir)
        .with_context(|| format!("failed to create directory {}", dst_dir.display()))?;

    let mut entries = fs::read_dir(src_dir)
        .with_context(|| format!("failed to read {}", src_dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to list {}", src_dir.display()))?;
    entries.sort();

    for src in entries {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dst = dst_dir.join(name);
        move_entry(&src, &dst).with_context(|| {
            format!("failed to move {} to {}", src.display(), dst.display())
        })?;
    }
    Ok(())
}

/// First-level subdirectories of `dir`, sorted by name.
pub fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Returns the first `dir/name` that is a regular file.
pub fn find_file_in<'a, I>(dirs: I, name: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("failed to create {}", dst.display()))?;
    for entry in fs::read_dir(src).with_context(|| format!("failed to read {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let metadata = fs::symlink_metadata(&src_path)
            .with_context(|| format!("failed to stat {}", src_path.display()))?;
        if metadata.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
            continue;
        }
        copy_entry(&src_path, &dst_path, &metadata)?;
    }
    Ok(())
}

fn copy_entry(src: &Path, dst: &Path, metadata: &fs::Metadata) -> Result<()> {
    #[cfg(unix)]
    if metadata.file_type().is_symlink() {
        let target = fs::read_link(src)
            .with_context(|| format!("failed to read symlink {}", src.display()))?;
        std::os::unix::fs::symlink(&target, dst).with_context(|| {
            format!(
                "failed to create symlink {} -> {}",
                dst.display(),
                target.display()
            )
        })?;
        return Ok(());
    }
    #[cfg(not(unix))]
    let _ = metadata;

    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}
