mod bun;
mod node;
mod python;
mod ripgrep;
mod types;
mod uv;

pub use bun::bun_platform;
pub use node::node_platform;
pub use python::{python_platform, split_python_version, PythonVersion};
pub use ripgrep::{ripgrep_target, RipgrepTarget};
pub use types::PlatformToken;
pub use uv::uv_target;

use rtinject_core::{PlatformSpec, Result, RuntimeKind};

/// Distributor-specific platform token for `kind` on `platform`.
pub fn resolve(kind: RuntimeKind, platform: &PlatformSpec) -> Result<PlatformToken> {
    match kind {
        RuntimeKind::Node => node_platform(platform).map(PlatformToken::exact),
        RuntimeKind::Bun => bun_platform(platform).map(PlatformToken::exact),
        RuntimeKind::Uv => Ok(uv_target(platform)),
        RuntimeKind::Ripgrep => {
            ripgrep_target(platform).map(|target| PlatformToken::exact(target.triple))
        }
        RuntimeKind::Python => python_platform(platform).map(PlatformToken::exact),
    }
}
