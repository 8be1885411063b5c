use std::io;

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub(crate) const LOG_ENV: &str = "RTINJECT_LOG";

const CRATE_TARGETS: &[&str] = &[
    "rtinject",
    "rtinject_core",
    "rtinject_resolver",
    "rtinject_registry",
    "rtinject_net",
    "rtinject_installer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Directives applied when `RTINJECT_LOG` is unset: dependencies stay at
/// `warn`, workspace crates follow `level`.
pub(crate) fn default_directives(level: LogLevel) -> String {
    let level = level.as_str();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

pub(crate) fn init_logging(level: LogLevel) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(level))
            .map_err(|err| anyhow!("failed to create log filter: {err}"))?,
    };

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}
