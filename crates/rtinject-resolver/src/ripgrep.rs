use rtinject_core::{ArchiveType, Error, PlatformSpec, Result, RuntimeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RipgrepTarget {
    pub triple: &'static str,
    pub archive: ArchiveType,
}

const RIPGREP_TARGETS: &[(&str, &str, ArchiveType)] = &[
    ("x64-darwin", "x86_64-apple-darwin", ArchiveType::TarGz),
    ("arm64-darwin", "aarch64-apple-darwin", ArchiveType::TarGz),
    ("x64-linux", "x86_64-unknown-linux-musl", ArchiveType::TarGz),
    ("arm64-linux", "aarch64-unknown-linux-gnu", ArchiveType::TarGz),
    ("arm-linux", "armv7-unknown-linux-gnueabihf", ArchiveType::TarGz),
    ("armv7l-linux", "armv7-unknown-linux-gnueabihf", ArchiveType::TarGz),
    ("x64-win32", "x86_64-pc-windows-msvc", ArchiveType::Zip),
    ("arm64-win32", "aarch64-pc-windows-msvc", ArchiveType::Zip),
];

pub fn ripgrep_target(platform: &PlatformSpec) -> Result<RipgrepTarget> {
    let key = format!("{}-{}", platform.arch(), platform.os());
    RIPGREP_TARGETS
        .iter()
        .find(|(candidate, _, _)| *candidate == key)
        .map(|(_, triple, archive)| RipgrepTarget {
            triple: *triple,
            archive: *archive,
        })
        .ok_or_else(|| {
            Error::unsupported_platform(
                RuntimeKind::Ripgrep,
                platform.os().as_str(),
                platform.arch_label(),
            )
        })
}
