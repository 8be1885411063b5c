use std::ffi::OsString;
use std::fs::{self, File};
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use rtinject_core::{ArchiveType, Error};
use tracing::debug;

pub fn extract_archive(archive_path: &Path, archive_type: ArchiveType, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create extraction dir: {}", dst.display()))?;
    debug!(
        archive = %archive_path.display(),
        kind = %archive_type,
        dst = %dst.display(),
        "extracting archive"
    );
    match archive_type {
        ArchiveType::TarGz => extract_tar_gz(archive_path, dst),
        ArchiveType::Zip => extract_zip(archive_path, dst),
    }
}

fn extract_tar_gz(archive_path: &Path, dst: &Path) -> Result<()> {
    let failure = |detail: String| Error::ExtractionFailure {
        archive: archive_path.to_path_buf(),
        detail,
    };
    let file = File::open(archive_path).map_err(|err| failure(err.to_string()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    archive
        .unpack(dst)
        .map_err(|err| failure(err.to_string()))?;
    Ok(())
}

fn extract_zip(archive_path: &Path, dst: &Path) -> Result<()> {
    extract_zip_with_runner(archive_path, dst, |command, context| {
        run_command(command, context)
    })
}

/// Tries each available unzip tool in turn; the error carries every
/// tool's diagnostics when all of them fail.
pub(crate) fn extract_zip_with_runner<RunCommand>(
    archive_path: &Path,
    dst: &Path,
    mut run: RunCommand,
) -> Result<()>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<()>,
{
    let mut attempts = Vec::new();
    for (mut command, context) in zip_extract_commands(archive_path, dst) {
        match run(&mut command, context) {
            Ok(()) => return Ok(()),
            Err(err) => attempts.push(format!("{err:#}")),
        }
    }

    Err(Error::ExtractionFailure {
        archive: archive_path.to_path_buf(),
        detail: attempts.join("; "),
    }
    .into())
}

pub(crate) fn zip_extract_commands(
    archive_path: &Path,
    dst: &Path,
) -> Vec<(Command, &'static str)> {
    let mut commands = Vec::new();
    if cfg!(windows) {
        let mut command = Command::new("powershell");
        command.arg("-NoProfile").arg("-Command").arg(format!(
            "Expand-Archive -LiteralPath '{}' -DestinationPath '{}' -Force",
            escape_ps_single_quote(archive_path),
            escape_ps_single_quote(dst)
        ));
        commands.push((command, "powershell Expand-Archive failed"));
    }

    let mut unzip = Command::new("unzip");
    unzip
        .arg("-q")
        .arg("-o")
        .arg(archive_path)
        .arg("-d")
        .arg(dst);
    commands.push((unzip, "unzip failed"));

    let mut tar = Command::new("tar");
    tar.arg("-xf").arg(archive_path).arg("-C").arg(dst);
    commands.push((tar, "tar fallback failed"));
    commands
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}

fn escape_ps_single_quote(path: &Path) -> String {
    let mut os = OsString::new();
    os.push(path.as_os_str());
    os.to_string_lossy().replace('\'', "''")
}
