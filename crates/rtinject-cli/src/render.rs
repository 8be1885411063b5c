use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use rtinject_core::RuntimeKind;
use rtinject_installer::{InjectPlan, InjectReport, InstallStatus};
use rtinject_net::Reachability;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        match self.style {
            OutputStyle::Plain => println!("{}", render_status_line(self.style, status, message)),
            OutputStyle::Rich => println!(
                "{} {message}",
                colorize(status_style(status), status_badge(status))
            ),
        }
    }

    pub(crate) fn print_line(self, line: &str) {
        match self.style {
            OutputStyle::Plain => println!("{line}"),
            OutputStyle::Rich => println!("     {line}"),
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }
}

pub(crate) struct DownloadProgress {
    progress_bar: Option<ProgressBar>,
}

impl DownloadProgress {
    pub(crate) fn start(style: OutputStyle, kind: RuntimeKind) -> Self {
        let progress_bar = if style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new(0);
            if let Ok(bar_style) = ProgressStyle::with_template(
                "{spinner:.cyan.bold} {msg:<8} [{bar:20.cyan/blue}] {bytes:>10}/{total_bytes:10} {elapsed_precise}",
            ) {
                progress_bar.set_style(bar_style.progress_chars("=>-"));
            }
            progress_bar.set_message(kind.to_string());
            Some(progress_bar)
        } else {
            None
        };
        Self { progress_bar }
    }

    pub(crate) fn callback(&self) -> impl Fn(u64, Option<u64>) + Send + Sync + 'static {
        let progress_bar = self.progress_bar.clone();
        move |downloaded, total| {
            let Some(progress_bar) = &progress_bar else {
                return;
            };
            if let Some(total) = total {
                progress_bar.set_length(total);
            }
            progress_bar.set_position(downloaded);
        }
    }

    pub(crate) fn finish(self) {
        if let Some(progress_bar) = self.progress_bar {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

pub(crate) fn format_plan_lines(plan: &InjectPlan) -> Vec<String> {
    let token = if plan.token.fallback {
        format!("{} (fallback)", plan.token.as_str())
    } else {
        plan.token.as_str().to_string()
    };
    let proxy = plan
        .proxy
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "direct".to_string());

    vec![
        format!("kind: {}", plan.kind),
        format!("version: {}", plan.version),
        format!("platform: {}", plan.platform),
        format!("token: {token}"),
        format!("url: {}", plan.url),
        format!("archive: {}", plan.archive),
        format!("executable: {}", plan.executable.display()),
        format!("proxy: {proxy}"),
    ]
}

pub(crate) fn format_inject_report_lines(report: &InjectReport) -> Vec<String> {
    let mut lines = Vec::new();
    match report.status {
        InstallStatus::Installed => {
            lines.push(format!(
                "installed {} {} for {}",
                report.kind, report.version, report.platform
            ));
            lines.push(format!("source: {}", report.url));
        }
        InstallStatus::AlreadyInstalled => lines.push(format!(
            "{} {} already installed for {}",
            report.kind, report.version, report.platform
        )),
    }
    lines.push(format!("executable: {}", report.executable.display()));
    if let Some(cleanup) = &report.cleanup {
        lines.push(format!("cleanup: removed {} path(s)", cleanup.removed.len()));
    }
    lines
}

pub(crate) fn format_check_line(url: &str, reachability: Reachability) -> String {
    let verdict = if reachability.reachable {
        "reachable"
    } else {
        "unreachable"
    };
    format!("{verdict}: HTTP {} {url}", reachability.status)
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::BrightGreen,
        "warn" => AnsiColor::BrightYellow,
        "err" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightBlue,
    };
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
