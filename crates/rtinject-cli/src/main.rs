use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use rtinject_core::RuntimeKind;
use rtinject_installer::{HttpFetcher, Injector, InstallStatus};
use rtinject_net::{check_url_reachable, ProxyResolver};
use rtinject_registry::Registry;
use tracing::debug;

mod completion;
mod config;
mod logging;
mod render;

use completion::{write_completions_script, CliCompletionShell};
use config::{build_inject_options, DirRequirement};
use logging::{init_logging, LogLevel};
use render::{
    format_check_line, format_inject_report_lines, format_plan_lines, DownloadProgress,
    OutputStyle, TerminalRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "rtinject", version)]
#[command(about = "Fetch and unpack language runtimes", long_about = None)]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    /// Disable colors and progress bars.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a runtime unless the requested version is already present.
    Install(TargetArgs),
    /// Show what would be downloaded without touching disk or network.
    Plan(TargetArgs),
    /// Check that the resolved download URL is reachable.
    Check(TargetArgs),
    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct TargetArgs {
    #[arg(short, long)]
    kind: Option<RuntimeKind>,
    #[arg(short, long)]
    version: Option<String>,
    #[arg(long)]
    os: Option<String>,
    #[arg(long)]
    arch: Option<String>,
    #[arg(short, long)]
    dir: Option<PathBuf>,
    /// JSON file with defaults for any of these flags.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    no_cleanup: bool,
    #[arg(long)]
    no_remove_docs: bool,
    #[arg(long)]
    no_remove_dev_files: bool,
    #[arg(long)]
    no_remove_source_maps: bool,
    #[arg(long = "cleanup-pattern", value_name = "GLOB")]
    cleanup_patterns: Vec<String>,
    #[arg(long)]
    http_proxy: Option<String>,
    #[arg(long)]
    https_proxy: Option<String>,
    #[arg(long)]
    no_proxy: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;
    run_cli(cli)
}

fn run_cli(cli: Cli) -> Result<()> {
    let style = current_output_style(cli.plain);
    let renderer = TerminalRenderer::from_style(style);

    match cli.command {
        Commands::Install(args) => {
            let options = build_inject_options(&args, DirRequirement::Required)?;
            let progress = DownloadProgress::start(style, options.kind);
            let fetcher = HttpFetcher::new(ProxyResolver::from_env(options.proxy.clone()))
                .with_progress(progress.callback());
            let injector = Injector::with_fetcher(Registry::new(), fetcher);

            let report = injector.inject(&options);
            progress.finish();
            let report = report?;

            let status = match report.status {
                InstallStatus::Installed => "ok",
                InstallStatus::AlreadyInstalled => "step",
            };
            for (index, line) in format_inject_report_lines(&report).into_iter().enumerate() {
                if index == 0 {
                    renderer.print_status(status, &line);
                } else {
                    renderer.print_line(&line);
                }
            }
            if let Some(cleanup) = &report.cleanup {
                for failure in &cleanup.failures {
                    renderer.print_status(
                        "warn",
                        &format!("cleanup: {}: {}", failure.subject, failure.reason),
                    );
                }
            }
        }
        Commands::Plan(args) => {
            let options = build_inject_options(&args, DirRequirement::Optional)?;
            let plan = Injector::default().plan(&options)?;
            renderer.print_lines(&format_plan_lines(&plan));
        }
        Commands::Check(args) => {
            let options = build_inject_options(&args, DirRequirement::Optional)?;
            let plan = Injector::default().plan(&options)?;
            let resolver = ProxyResolver::from_env(options.proxy.clone());
            debug!(url = %plan.url, "checking reachability");
            let reachability = check_url_reachable(&resolver, &plan.url)?;
            let line = format_check_line(&plan.url, reachability);
            if !reachability.reachable {
                bail!("{line}");
            }
            renderer.print_status("ok", &line);
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

fn current_output_style(plain: bool) -> OutputStyle {
    if plain || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}
