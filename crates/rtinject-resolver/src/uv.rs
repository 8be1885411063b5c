use rtinject_core::{Os, PlatformSpec};
use tracing::warn;

use crate::PlatformToken;

const LINUX_FALLBACK_TRIPLE: &str = "x86_64-unknown-linux-gnu";

/// uv publishes one archive per Rust target triple, with musl builds beside
/// the glibc ones. Unknown Linux architectures resolve to the x86_64 glibc
/// triple instead of failing; the returned token is flagged as a fallback.
pub fn uv_target(platform: &PlatformSpec) -> PlatformToken {
    let arch = platform.arch();
    let triple = match platform.os() {
        Os::Darwin => match arch {
            "arm64" => "aarch64-apple-darwin",
            _ => "x86_64-apple-darwin",
        },
        Os::Windows => match arch {
            "arm64" => "aarch64-pc-windows-msvc",
            "ia32" | "x86" => "i686-pc-windows-msvc",
            _ => "x86_64-pc-windows-msvc",
        },
        Os::Linux => {
            let mapped = if platform.is_musl() {
                linux_musl_triple(arch)
            } else {
                linux_gnu_triple(arch)
            };
            match mapped {
                Some(triple) => triple,
                None => {
                    warn!(
                        arch = %platform.arch_label(),
                        fallback = LINUX_FALLBACK_TRIPLE,
                        "no uv build mapped for linux architecture; using fallback triple"
                    );
                    return PlatformToken::fallback(LINUX_FALLBACK_TRIPLE);
                }
            }
        }
    };
    PlatformToken::exact(triple)
}

fn linux_gnu_triple(arch: &str) -> Option<&'static str> {
    match arch {
        "x64" => Some("x86_64-unknown-linux-gnu"),
        "arm64" => Some("aarch64-unknown-linux-gnu"),
        "arm" | "armv7l" => Some("armv7-unknown-linux-gnueabihf"),
        "ia32" | "x86" => Some("i686-unknown-linux-gnu"),
        "ppc64" | "ppc64le" => Some("powerpc64le-unknown-linux-gnu"),
        "s390" | "s390x" => Some("s390x-unknown-linux-gnu"),
        "riscv64" => Some("riscv64gc-unknown-linux-gnu"),
        _ => None,
    }
}

fn linux_musl_triple(arch: &str) -> Option<&'static str> {
    match arch {
        "x64" => Some("x86_64-unknown-linux-musl"),
        "arm64" => Some("aarch64-unknown-linux-musl"),
        "arm" | "armv7l" => Some("armv7-unknown-linux-musleabihf"),
        "ia32" | "x86" => Some("i686-unknown-linux-musl"),
        _ => None,
    }
}
