use rtinject_core::{Os, PlatformSpec, Result};

pub fn node_platform(platform: &PlatformSpec) -> Result<String> {
    let arch = platform.arch();
    let token = match platform.os() {
        Os::Darwin => match arch {
            "arm64" => "darwin-arm64",
            _ => "darwin-x64",
        },
        Os::Linux => match arch {
            "arm" | "armv7l" => "linux-armv7l",
            "arm64" => "linux-arm64",
            "ppc64" | "ppc64le" => "linux-ppc64le",
            "s390" | "s390x" => "linux-s390x",
            _ => "linux-x64",
        },
        Os::Windows => match arch {
            "arm64" => "win-arm64",
            "ia32" | "x86" => "win-x86",
            _ => "win-x64",
        },
    };
    Ok(token.to_string())
}
