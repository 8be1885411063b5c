mod bun;
mod fs_ops;
mod node;
mod python;
mod registry;
mod ripgrep;
mod rule;
mod uv;

pub use bun::BunRule;
pub use fs_ops::{copy_dir_recursive, find_file_in, move_dir_contents, move_entry, sorted_subdirs};
pub use node::NodeRule;
pub use python::{PythonRule, PYTHON_DEFAULT_RELEASE_DATE};
pub use registry::Registry;
pub use ripgrep::RipgrepRule;
pub use rule::{executable_file_name, windows_default_archive, RuntimeRule};
pub use uv::UvRule;

#[cfg(test)]
mod tests;
