use rtinject_core::{Error, Os, PlatformSpec, Result, RuntimeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonVersion {
    pub semver: String,
    pub release_date: String,
}

/// Splits `<semver>+<releaseDate>` on the first `+`.
pub fn split_python_version(version: &str, default_release_date: &str) -> PythonVersion {
    match version.split_once('+') {
        Some((semver, date)) if !date.is_empty() => PythonVersion {
            semver: semver.to_string(),
            release_date: date.to_string(),
        },
        Some((semver, _)) => PythonVersion {
            semver: semver.to_string(),
            release_date: default_release_date.to_string(),
        },
        None => PythonVersion {
            semver: version.to_string(),
            release_date: default_release_date.to_string(),
        },
    }
}

pub fn python_platform(platform: &PlatformSpec) -> Result<String> {
    let unsupported = || {
        Error::unsupported_platform(
            RuntimeKind::Python,
            platform.os().as_str(),
            platform.arch_label(),
        )
    };
    if platform.is_musl() {
        return Err(unsupported());
    }

    let arch = match platform.arch() {
        "x64" => "x86_64",
        "arm64" => "aarch64",
        _ => return Err(unsupported()),
    };
    let triple = match platform.os() {
        Os::Darwin => format!("{arch}-apple-darwin"),
        Os::Linux => format!("{arch}-unknown-linux-gnu"),
        Os::Windows => format!("{arch}-pc-windows-msvc"),
    };
    Ok(triple)
}
