mod archive;
mod cleanup;
mod error;
mod kind;
mod platform;

pub use archive::ArchiveType;
pub use cleanup::{CleanupConfig, CleanupRules};
pub use error::{Error, Result};
pub use kind::RuntimeKind;
pub use platform::{Os, PlatformSpec};
