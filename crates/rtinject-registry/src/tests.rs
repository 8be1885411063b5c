use super::*;
use rtinject_core::{ArchiveType, Error, PlatformSpec, RuntimeKind};
use std::fs;
use std::path::Path;

fn spec(os: &str, arch: &str) -> PlatformSpec {
    PlatformSpec::new(os, arch).expect("platform must parse")
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("must create parent");
    }
    fs::write(path, contents).expect("must write file");
}

fn executable_not_found(err: &anyhow::Error) -> Option<(RuntimeKind, String)> {
    match err.downcast_ref::<Error>() {
        Some(Error::ExecutableNotFound { kind, name, .. }) => Some((*kind, name.clone())),
        _ => None,
    }
}

#[test]
fn registry_has_a_rule_for_every_kind() {
    let registry = Registry::new();
    let kinds = registry.rules().map(|rule| rule.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, RuntimeKind::ALL.to_vec());
    for kind in RuntimeKind::ALL {
        assert_eq!(registry.lookup(kind).kind(), kind);
        assert!(!registry.lookup(kind).default_version().is_empty());
    }
}

#[test]
fn registry_lookup_name_accepts_aliases_and_rejects_unknown() {
    let registry = Registry::new();
    let rule = registry.lookup_name("rg").expect("rg must resolve");
    assert_eq!(rule.kind(), RuntimeKind::Ripgrep);

    let err = registry
        .lookup_name("deno")
        .err()
        .expect("deno must be rejected");
    assert_eq!(err, Error::UnknownRuntimeKind("deno".to_string()));
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
}

#[test]
fn only_node_supports_cleanup() {
    let registry = Registry::new();
    for rule in registry.rules() {
        assert_eq!(rule.supports_cleanup(), rule.kind() == RuntimeKind::Node);
    }
}

#[test]
fn node_url_for_linux_x64() {
    let url = NodeRule
        .download_url("v24.12.0", &spec("linux", "x64"))
        .expect("must build url");
    assert_eq!(
        url,
        "https://nodejs.org/dist/v24.12.0/node-v24.12.0-linux-x64.tar.gz"
    );
}

#[test]
fn node_url_uses_zip_on_windows() {
    let url = NodeRule
        .download_url("v22.1.0", &spec("windows", "arm64"))
        .expect("must build url");
    assert_eq!(
        url,
        "https://nodejs.org/dist/v22.1.0/node-v22.1.0-win-arm64.zip"
    );
}

#[test]
fn bun_url_embeds_tag_and_token() {
    let url = BunRule
        .download_url("v1.3.5", &spec("darwin", "aarch64"))
        .expect("must build url");
    assert_eq!(
        url,
        "https://github.com/oven-sh/bun/releases/download/bun-v1.3.5/bun-darwin-aarch64.tar.gz"
    );
}

#[test]
fn uv_url_for_musl_target() {
    let platform = spec("linux", "x64-musl");
    assert_eq!(
        UvRule.archive_type(&platform).expect("must resolve"),
        ArchiveType::TarGz
    );
    let url = UvRule
        .download_url("0.9.18", &platform)
        .expect("must build url");
    assert_eq!(
        url,
        "https://github.com/astral-sh/uv/releases/download/0.9.18/uv-x86_64-unknown-linux-musl.tar.gz"
    );
}

#[test]
fn uv_url_for_unmapped_linux_arch_uses_fallback_triple() {
    let url = UvRule
        .download_url("0.9.18", &spec("linux", "loong64"))
        .expect("uv must fall back");
    assert!(url.ends_with("/uv-x86_64-unknown-linux-gnu.tar.gz"));
}

#[test]
fn ripgrep_url_and_archive_come_from_table() {
    let platform = spec("win32", "arm64");
    assert_eq!(
        RipgrepRule.archive_type(&platform).expect("must resolve"),
        ArchiveType::Zip
    );
    let url = RipgrepRule
        .download_url("14.1.1", &platform)
        .expect("must build url");
    assert_eq!(
        url,
        "https://github.com/BurntSushi/ripgrep/releases/download/14.1.1/ripgrep-14.1.1-aarch64-pc-windows-msvc.zip"
    );
}

#[test]
fn ripgrep_win32_x86_is_unsupported() {
    let platform = spec("win32", "x86");
    let err = RipgrepRule
        .download_url("14.1.1", &platform)
        .expect_err("must reject win32 x86");
    assert!(matches!(
        err,
        Error::UnsupportedPlatform {
            kind: Some(RuntimeKind::Ripgrep),
            ..
        }
    ));
    assert!(RipgrepRule.archive_type(&platform).is_err());
}

#[test]
fn python_url_splits_composite_version() {
    let url = PythonRule
        .download_url("3.12.8+20241219", &spec("linux", "x86_64"))
        .expect("must build url");
    assert_eq!(
        url,
        "https://github.com/astral-sh/python-build-standalone/releases/download/20241219/cpython-3.12.8%2B20241219-x86_64-unknown-linux-gnu-install_only.tar.gz"
    );
}

#[test]
fn python_url_defaults_release_date() {
    let url = PythonRule
        .download_url("3.11.9", &spec("darwin", "arm64"))
        .expect("must build url");
    let date_segment = format!("/download/{PYTHON_DEFAULT_RELEASE_DATE}/");
    assert!(url.contains(&date_segment));
    assert!(url.contains(&format!(
        "cpython-3.11.9%2B{PYTHON_DEFAULT_RELEASE_DATE}-aarch64-apple-darwin"
    )));
}

#[test]
fn python_always_uses_tar_gz() {
    assert_eq!(
        PythonRule
            .archive_type(&spec("win32", "x64"))
            .expect("must resolve"),
        ArchiveType::TarGz
    );
}

#[test]
fn executable_paths_follow_platform_layout() {
    let root = Path::new("/opt/rt");
    let linux = spec("linux", "x64");
    let windows = spec("win32", "x64");

    assert_eq!(
        NodeRule.executable_path(root, &linux),
        root.join("bin/node")
    );
    assert_eq!(
        NodeRule.executable_path(root, &windows),
        root.join("node.exe")
    );
    assert_eq!(
        BunRule.executable_path(root, &windows),
        root.join("bun.exe")
    );
    assert_eq!(UvRule.executable_path(root, &linux), root.join("uv"));
    assert_eq!(
        UvRule.companion_executables(root, &windows),
        vec![root.join("uvx.exe")]
    );
    assert_eq!(RipgrepRule.executable_path(root, &linux), root.join("rg"));
    assert_eq!(
        PythonRule.executable_path(root, &linux),
        root.join("bin/python3")
    );
    assert_eq!(
        PythonRule.executable_path(root, &windows),
        root.join("python.exe")
    );
}

#[test]
fn version_args_differ_for_node() {
    assert_eq!(NodeRule.version_args(), &["-v"]);
    for kind in [
        RuntimeKind::Bun,
        RuntimeKind::Uv,
        RuntimeKind::Ripgrep,
        RuntimeKind::Python,
    ] {
        assert_eq!(Registry::new().lookup(kind).version_args(), &["--version"]);
    }
}

const NODE_OUTPUT: &str = "v1.3.5\n";
const BUN_OUTPUT: &str = "1.3.5\n";
const UV_OUTPUT: &str = "uv 0.9.18 (0cee76417 2025-12-16)\n";
const RIPGREP_OUTPUT: &str = "ripgrep 14.1.1\n\nfeatures:+pcre2\n";
const PYTHON_OUTPUT: &str = "Python 3.12.8\n";

#[test]
fn version_match_rules_are_independent_per_kind() {
    let registry = Registry::new();
    let cases = [
        // Same fixtures, different verdicts for node and bun.
        (RuntimeKind::Node, NODE_OUTPUT, "v1.3.5", true),
        (RuntimeKind::Bun, NODE_OUTPUT, "v1.3.5", true),
        (RuntimeKind::Node, BUN_OUTPUT, "v1.3.5", false),
        (RuntimeKind::Bun, BUN_OUTPUT, "v1.3.5", true),
        (RuntimeKind::Bun, BUN_OUTPUT, "1.3.5", true),
        (RuntimeKind::Node, "node v1.3.5", "v1.3.5", false),
        (RuntimeKind::Bun, BUN_OUTPUT, "v1.3.6", false),
        (RuntimeKind::Uv, UV_OUTPUT, "0.9.18", true),
        (RuntimeKind::Uv, UV_OUTPUT, "0.9.17", false),
        (RuntimeKind::Uv, BUN_OUTPUT, "v1.3.5", false),
        (RuntimeKind::Ripgrep, RIPGREP_OUTPUT, "14.1.1", true),
        (RuntimeKind::Ripgrep, RIPGREP_OUTPUT, "14.1.0", false),
        (RuntimeKind::Python, PYTHON_OUTPUT, "3.12.8+20241219", true),
        (RuntimeKind::Python, PYTHON_OUTPUT, "3.12.8", true),
        (RuntimeKind::Python, PYTHON_OUTPUT, "3.12.9+20241219", false),
        (RuntimeKind::Uv, PYTHON_OUTPUT, "3.12.8+20241219", false),
    ];

    for (kind, output, version, expected) in cases {
        assert_eq!(
            registry.lookup(kind).version_matches(output, version),
            expected,
            "{kind} output={output:?} version={version}"
        );
    }
}

#[test]
fn node_normalize_moves_nested_distribution_up() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    let nested = scratch.path().join("node-v24.12.0-linux-x64");
    write_file(&nested.join("bin/node"), "#!/bin/sh\n");
    write_file(&nested.join("lib/node_modules/npm/package.json"), "{}");
    write_file(&nested.join("README.md"), "docs");

    NodeRule
        .normalize(
            scratch.path(),
            target.path(),
            "v24.12.0",
            &spec("linux", "x64"),
        )
        .expect("must normalize");

    assert!(target.path().join("bin/node").is_file());
    assert!(target
        .path()
        .join("lib/node_modules/npm/package.json")
        .is_file());
    assert!(target.path().join("README.md").is_file());
    assert!(!nested.join("bin").exists());
}

#[test]
fn node_normalize_requires_versioned_directory() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("node-v20.0.0-linux-x64/bin/node"), "");

    let err = NodeRule
        .normalize(
            scratch.path(),
            target.path(),
            "v24.12.0",
            &spec("linux", "x64"),
        )
        .expect_err("must reject mismatched layout");
    assert_eq!(
        executable_not_found(&err),
        Some((RuntimeKind::Node, "node-v24.12.0-linux-x64".to_string()))
    );
}

#[test]
fn bun_normalize_prefers_nested_directory() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("bun-linux-x64/bun"), "nested");

    BunRule
        .normalize(
            scratch.path(),
            target.path(),
            "v1.3.5",
            &spec("linux", "x64"),
        )
        .expect("must normalize");

    assert_eq!(
        fs::read_to_string(target.path().join("bun")).expect("must read bun"),
        "nested"
    );
}

#[test]
fn bun_normalize_falls_back_to_scratch_root() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("bun.exe"), "root");

    BunRule
        .normalize(
            scratch.path(),
            target.path(),
            "v1.3.5",
            &spec("win32", "x64"),
        )
        .expect("must normalize");

    assert!(target.path().join("bun.exe").is_file());
}

#[test]
fn bun_normalize_fails_when_executable_is_missing() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("bun-linux-x64/README"), "");

    let err = BunRule
        .normalize(
            scratch.path(),
            target.path(),
            "v1.3.5",
            &spec("linux", "x64"),
        )
        .expect_err("must fail");
    assert_eq!(
        executable_not_found(&err),
        Some((RuntimeKind::Bun, "bun".to_string()))
    );
}

#[test]
fn uv_normalize_finds_executables_in_first_subdirectory() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    let nested = scratch.path().join("uv-x86_64-unknown-linux-musl");
    write_file(&nested.join("uv"), "uv");
    write_file(&nested.join("uvx"), "uvx");

    UvRule
        .normalize(
            scratch.path(),
            target.path(),
            "0.9.18",
            &spec("linux", "x64-musl"),
        )
        .expect("must normalize");

    assert!(target.path().join("uv").is_file());
    assert!(target.path().join("uvx").is_file());
}

#[test]
fn uv_normalize_tolerates_missing_uvx() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("uv"), "uv");

    UvRule
        .normalize(
            scratch.path(),
            target.path(),
            "0.9.18",
            &spec("linux", "x64"),
        )
        .expect("must normalize without uvx");

    assert!(target.path().join("uv").is_file());
    assert!(!target.path().join("uvx").exists());
}

#[test]
fn uv_normalize_fails_without_uv() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(
        &scratch.path().join("uv-x86_64-unknown-linux-gnu/uvx"),
        "uvx",
    );

    let err = UvRule
        .normalize(
            scratch.path(),
            target.path(),
            "0.9.18",
            &spec("linux", "x64"),
        )
        .expect_err("must fail");
    assert_eq!(
        executable_not_found(&err),
        Some((RuntimeKind::Uv, "uv".to_string()))
    );
}

#[test]
fn ripgrep_normalize_scans_every_subdirectory() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    fs::create_dir_all(scratch.path().join("complete")).expect("must create dir");
    write_file(
        &scratch
            .path()
            .join("ripgrep-14.1.1-x86_64-unknown-linux-musl/rg"),
        "rg",
    );

    RipgrepRule
        .normalize(
            scratch.path(),
            target.path(),
            "14.1.1",
            &spec("linux", "x64"),
        )
        .expect("must normalize");

    assert!(target.path().join("rg").is_file());
}

#[test]
fn ripgrep_normalize_fails_when_absent() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("ripgrep-14.1.1/doc/rg.1"), "");

    let err = RipgrepRule
        .normalize(
            scratch.path(),
            target.path(),
            "14.1.1",
            &spec("linux", "x64"),
        )
        .expect_err("must fail");
    assert_eq!(
        executable_not_found(&err),
        Some((RuntimeKind::Ripgrep, "rg".to_string()))
    );
}

#[test]
fn python_normalize_moves_python_directory_contents() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("python/bin/python3"), "");
    write_file(&scratch.path().join("python/lib/python3.12/os.py"), "");

    PythonRule
        .normalize(
            scratch.path(),
            target.path(),
            "3.12.8+20241219",
            &spec("linux", "x64"),
        )
        .expect("must normalize");

    assert!(target.path().join("bin/python3").is_file());
    assert!(target.path().join("lib/python3.12/os.py").is_file());
    assert!(!target.path().join("python").exists());
}

#[test]
fn python_normalize_requires_python_directory() {
    let scratch = tempfile::tempdir().expect("must create scratch");
    let target = tempfile::tempdir().expect("must create target");
    write_file(&scratch.path().join("cpython/bin/python3"), "");

    let err = PythonRule
        .normalize(
            scratch.path(),
            target.path(),
            "3.12.8+20241219",
            &spec("linux", "x64"),
        )
        .expect_err("must fail");
    assert_eq!(
        executable_not_found(&err),
        Some((RuntimeKind::Python, "python".to_string()))
    );
}

#[test]
fn sorted_subdirs_ignores_files_and_sorts() {
    let root = tempfile::tempdir().expect("must create root");
    fs::create_dir_all(root.path().join("b")).expect("must create dir");
    fs::create_dir_all(root.path().join("a")).expect("must create dir");
    write_file(&root.path().join("c"), "");

    let dirs = sorted_subdirs(root.path()).expect("must list");
    assert_eq!(dirs, vec![root.path().join("a"), root.path().join("b")]);
}

#[test]
fn copy_dir_recursive_preserves_nested_files() {
    let src = tempfile::tempdir().expect("must create src");
    let dst = tempfile::tempdir().expect("must create dst");
    write_file(&src.path().join("one/two/three.txt"), "3");

    copy_dir_recursive(src.path(), &dst.path().join("copy")).expect("must copy");

    assert_eq!(
        fs::read_to_string(dst.path().join("copy/one/two/three.txt")).expect("must read"),
        "3"
    );
}
