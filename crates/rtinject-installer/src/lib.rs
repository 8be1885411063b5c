mod cleanup;
mod extract;
mod layout;
mod marker;
mod permissions;
mod pipeline;
mod probe;

pub use cleanup::{cleanup, cleanup_patterns, CleanupFailure, CleanupReport};
pub use extract::extract_archive;
pub use layout::{archive_file_name, marker_file_name, TargetLayout};
pub use marker::{read_marker, remove_marker, write_marker};
pub use permissions::{mark_executables, set_executable, EXECUTABLE_MODE};
pub use pipeline::{
    plan, ArchiveFetcher, HttpFetcher, InjectOptions, InjectPlan, InjectReport, Injector,
    InstallStatus,
};
pub use probe::{is_installed, run_version_command};
