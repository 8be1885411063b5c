use rtinject_core::{Os, PlatformSpec, Result};

pub fn bun_platform(platform: &PlatformSpec) -> Result<String> {
    let arch = match platform.arch() {
        "arm64" => "aarch64",
        _ => "x64",
    };
    let token = match platform.os() {
        Os::Darwin => format!("darwin-{arch}"),
        Os::Linux if platform.is_musl() => format!("linux-{arch}-musl"),
        Os::Linux => format!("linux-{arch}"),
        Os::Windows => format!("windows-{arch}"),
    };
    Ok(token)
}
