use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rtinject_core::{ArchiveType, CleanupConfig, PlatformSpec, RuntimeKind};
use rtinject_net::{download_to_file_with_progress, ProxyConfig, ProxyOptions, ProxyResolver};
use rtinject_registry::Registry;
use rtinject_resolver::PlatformToken;
use tracing::{debug, info, warn};

use crate::{
    archive_file_name, cleanup, extract_archive, is_installed, mark_executables, remove_marker,
    write_marker, CleanupReport, TargetLayout,
};

/// Downloads one archive to a local path.
pub trait ArchiveFetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

type ProgressCallback = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Streams archives over HTTP through the resolved proxy.
#[derive(Clone)]
pub struct HttpFetcher {
    resolver: ProxyResolver,
    progress: Option<ProgressCallback>,
}

impl HttpFetcher {
    pub fn new(resolver: ProxyResolver) -> Self {
        Self {
            resolver,
            progress: None,
        }
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("resolver", &self.resolver)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let progress = self.progress.clone();
        download_to_file_with_progress(&self.resolver, url, dest, |downloaded, total| {
            if let Some(progress) = &progress {
                progress(downloaded, total);
            }
        })
        .map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectOptions {
    pub kind: RuntimeKind,
    /// Defaults to the kind's registry version.
    pub version: Option<String>,
    /// Defaults to the host OS.
    pub os: Option<String>,
    /// Defaults to the host architecture.
    pub arch: Option<String>,
    pub target_dir: PathBuf,
    pub cleanup: CleanupConfig,
    pub proxy: ProxyOptions,
}

impl InjectOptions {
    pub fn new(kind: RuntimeKind, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            version: None,
            os: None,
            arch: None,
            target_dir: target_dir.into(),
            cleanup: CleanupConfig::default(),
            proxy: ProxyOptions::default(),
        }
    }
}

/// Everything derived from the options before any disk or network work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectPlan {
    pub kind: RuntimeKind,
    pub version: String,
    pub platform: PlatformSpec,
    pub token: PlatformToken,
    pub url: String,
    pub archive: ArchiveType,
    pub executable: PathBuf,
    pub layout: TargetLayout,
    pub proxy: Option<ProxyConfig>,
}

impl InjectPlan {
    pub fn archive_file_name(&self) -> String {
        archive_file_name(self.kind, &self.version, self.archive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    AlreadyInstalled,
    Installed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectReport {
    pub kind: RuntimeKind,
    pub version: String,
    pub platform: PlatformSpec,
    pub url: String,
    pub executable: PathBuf,
    pub status: InstallStatus,
    pub cleanup: Option<CleanupReport>,
}

impl InjectReport {
    fn from_plan(plan: &InjectPlan, status: InstallStatus, cleanup: Option<CleanupReport>) -> Self {
        Self {
            kind: plan.kind,
            version: plan.version.clone(),
            platform: plan.platform.clone(),
            url: plan.url.clone(),
            executable: plan.executable.clone(),
            status,
            cleanup,
        }
    }
}

/// Resolves every configuration-dependent value of an injection.
pub fn plan(
    registry: &Registry,
    resolver: &ProxyResolver,
    options: &InjectOptions,
) -> Result<InjectPlan> {
    let mut plan = plan_target(registry, options)?;
    plan.proxy = resolver.resolve_for_url(&plan.url)?;
    Ok(plan)
}

/// Everything but the proxy, which only matters once a download is needed.
fn plan_target(registry: &Registry, options: &InjectOptions) -> Result<InjectPlan> {
    let rule = registry.lookup(options.kind);
    let platform = PlatformSpec::from_parts(options.os.as_deref(), options.arch.as_deref())?;
    let version = options
        .version
        .as_deref()
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .unwrap_or(rule.default_version())
        .to_string();

    let token = rule.platform_token(&platform)?;
    let url = rule.download_url(&version, &platform)?;
    let archive = rule.archive_type(&platform)?;
    let layout = TargetLayout::new(&options.target_dir);
    let executable = rule.executable_path(layout.root(), &platform);

    Ok(InjectPlan {
        kind: options.kind,
        version,
        platform,
        token,
        url,
        archive,
        executable,
        layout,
        proxy: None,
    })
}

/// Fetch, extract and normalize runtimes into target directories.
#[derive(Clone)]
pub struct Injector {
    registry: Registry,
    fetcher: Option<Arc<dyn ArchiveFetcher>>,
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("registry", &self.registry)
            .field("custom_fetcher", &self.fetcher.is_some())
            .finish()
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl Injector {
    /// Downloads over HTTP using each call's proxy options.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            fetcher: None,
        }
    }

    pub fn with_fetcher(registry: Registry, fetcher: impl ArchiveFetcher + 'static) -> Self {
        Self {
            registry,
            fetcher: Some(Arc::new(fetcher)),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn plan(&self, options: &InjectOptions) -> Result<InjectPlan> {
        plan(
            &self.registry,
            &ProxyResolver::from_env(options.proxy.clone()),
            options,
        )
    }

    /// Installs the requested runtime unless it is already present.
    pub fn inject(&self, options: &InjectOptions) -> Result<InjectReport> {
        let mut plan = plan_target(&self.registry, options)?;
        let rule = self.registry.lookup(plan.kind);
        let layout = &plan.layout;

        if is_installed(rule, &plan.version, &plan.platform, layout) {
            info!(
                kind = %plan.kind,
                version = %plan.version,
                dir = %layout.root().display(),
                "already installed"
            );
            return Ok(InjectReport::from_plan(
                &plan,
                InstallStatus::AlreadyInstalled,
                None,
            ));
        }

        let resolver = ProxyResolver::from_env(options.proxy.clone());
        plan.proxy = resolver.resolve_for_url(&plan.url)?;
        debug!(url = %plan.url, direct = plan.proxy.is_none(), "resolved proxy");

        layout.ensure_root()?;
        remove_marker(layout, plan.kind, &plan.platform)?;

        let temp = tempfile::Builder::new()
            .prefix(&format!("rtinject-{}-", plan.kind))
            .tempdir()
            .context("failed to create temp dir")?;
        let archive_path = temp.path().join(plan.archive_file_name());

        info!(kind = %plan.kind, version = %plan.version, url = %plan.url, "downloading");
        match &self.fetcher {
            Some(fetcher) => fetcher.fetch(&plan.url, &archive_path)?,
            None => HttpFetcher::new(resolver).fetch(&plan.url, &archive_path)?,
        }

        layout.empty()?;
        let scratch = temp.path().join("extract");
        extract_archive(&archive_path, plan.archive, &scratch)?;
        rule.normalize(&scratch, layout.root(), &plan.version, &plan.platform)
            .with_context(|| format!("failed to normalize {} archive", plan.kind))?;
        mark_executables(rule, layout, &plan.platform)?;
        let marker = write_marker(layout, plan.kind, &plan.platform, &plan.version)?;
        debug!(path = %marker.display(), "wrote install marker");

        let cleanup_report = if options.cleanup.is_enabled() && rule.supports_cleanup() {
            let report = cleanup(layout.root(), &plan.platform, &options.cleanup);
            debug!(
                removed = report.removed.len(),
                failures = report.failures.len(),
                "cleanup finished"
            );
            Some(report)
        } else {
            None
        };

        let temp_path = temp.path().to_path_buf();
        if let Err(err) = temp.close() {
            warn!(path = %temp_path.display(), error = %err, "failed to remove temp dir");
        }

        info!(
            kind = %plan.kind,
            version = %plan.version,
            executable = %plan.executable.display(),
            "installed"
        );
        Ok(InjectReport::from_plan(
            &plan,
            InstallStatus::Installed,
            cleanup_report,
        ))
    }
}
