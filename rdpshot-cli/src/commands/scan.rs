//! Scan command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use rdpshot_core::config::RdpshotConfig;
use rdpshot_core::{ProcessScannerRunner, ScanPlan, ScanRequest, ScanSummary, default_scanner_path};

use crate::cli::{Cli, OutputFormat};
use crate::error::CliError;
use crate::output::{OutputWriter, Render, write_rule};

/// Likely reasons for an empty output directory. Advisory only.
pub const EMPTY_RESULT_CAUSES: [&str; 3] = [
    "Targets are not reachable",
    "RDP is not enabled on targets",
    "Network Level Authentication (NLA) is enabled",
];

/// Execute a scan run.
pub async fn execute(
    cli: &Cli,
    config: &RdpshotConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let plan = ScanPlan::prepare(build_request(cli, config)?)?;

    if cli.dry_run {
        info!("dry run, scanner not started");
        return writer.render(&DryRunReport::from_plan(&plan));
    }

    writer.announce(&ScanBanner::from_plan(&plan))?;

    let runner = match writer.format() {
        OutputFormat::Text => ProcessScannerRunner::new(),
        OutputFormat::Json => ProcessScannerRunner::new().with_stdout_to_stderr(),
    };
    let summary = plan.run(&runner).await?;

    writer.render(&ScanReport::from_summary(&plan, summary))
}

/// Merge CLI flags over config defaults.
fn build_request(cli: &Cli, config: &RdpshotConfig) -> Result<ScanRequest, CliError> {
    let scanner_path = match &cli.scanner {
        Some(path) => path.clone(),
        None if !config.scan.scanner_path.is_empty() => PathBuf::from(&config.scan.scanner_path),
        None => default_scanner_path()?,
    };
    debug!(scanner = %scanner_path.display(), "resolved scanner path");

    Ok(ScanRequest {
        targets: cli.targets.clone(),
        target_file: cli.file.clone(),
        url: cli.url.clone().unwrap_or_else(|| config.scan.url.clone()),
        workers: cli.workers.unwrap_or(config.scan.workers),
        timeout_secs: cli.timeout.unwrap_or(config.scan.timeout_secs),
        output_dir: cli.output.clone(),
        scanner_path,
    })
}

/// Pre-run banner: effective settings and the exact command line.
pub struct ScanBanner {
    pub url: String,
    pub target_count: usize,
    pub workers: u32,
    pub timeout_secs: u32,
    pub output_dir: String,
    pub output_file: String,
    pub command_line: String,
}

impl ScanBanner {
    pub fn from_plan(plan: &ScanPlan) -> Self {
        let config = plan.config();
        Self {
            url: config.url.clone(),
            target_count: plan.targets().len(),
            workers: config.workers,
            timeout_secs: config.timeout_secs,
            output_dir: config.output_dir.display().to_string(),
            output_file: config.output_file.display().to_string(),
            command_line: plan.invocation().command_line(),
        }
    }
}

impl Render for ScanBanner {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        write_rule(w)?;
        writeln!(w, "{}", "RDP Screenshot Capture Tool".bold())?;
        write_rule(w)?;
        writeln!(w, "URL Template: {}", self.url)?;
        writeln!(w, "Targets: {} target(s) or file(s)", self.target_count)?;
        writeln!(w, "Workers: {}", self.workers)?;
        writeln!(w, "Timeout: {}s", self.timeout_secs)?;
        writeln!(w, "Output: {}", self.output_dir)?;
        write_rule(w)?;
        writeln!(w)?;
        writeln!(w, "{} Running: {}", "[*]".cyan(), self.command_line)?;
        writeln!(w, "{} Output will be saved to: {}", "[*]".cyan(), self.output_file)?;
        writeln!(
            w,
            "{} Starting scan with {} workers, {}s timeout...",
            "[*]".cyan(),
            self.workers,
            self.timeout_secs
        )?;
        writeln!(w)?;
        Ok(())
    }
}

/// `--dry-run` output: what would have been executed.
#[derive(Serialize)]
pub struct DryRunReport {
    pub dry_run: bool,
    pub program: String,
    pub args: Vec<String>,
    pub command_line: String,
    pub output_dir: String,
    pub results_file: String,
}

impl DryRunReport {
    pub fn from_plan(plan: &ScanPlan) -> Self {
        let invocation = plan.invocation();
        Self {
            dry_run: true,
            program: invocation.program().display().to_string(),
            args: invocation.args().to_vec(),
            command_line: invocation.command_line(),
            output_dir: plan.config().output_dir.display().to_string(),
            results_file: plan.config().output_file.display().to_string(),
        }
    }
}

impl Render for DryRunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{} Dry run, scanner not started", "[*]".cyan())?;
        writeln!(w, "{} Would run: {}", "[*]".cyan(), self.command_line)?;
        writeln!(w, "{} Output directory: {}", "[*]".cyan(), self.output_dir)?;
        writeln!(w, "{} Results file: {}", "[*]".cyan(), self.results_file)?;
        Ok(())
    }
}

/// Post-run summary.
#[derive(Serialize)]
pub struct ScanReport {
    pub url: String,
    pub workers: u32,
    pub timeout_secs: u32,
    pub targets: Vec<String>,
    pub output_dir: String,
    pub results_file: String,
    pub screenshots: Vec<String>,
    pub screenshot_count: usize,
}

impl ScanReport {
    pub fn from_summary(plan: &ScanPlan, summary: ScanSummary) -> Self {
        let config = plan.config();
        let screenshot_count = summary.screenshot_count();
        Self {
            url: config.url.clone(),
            workers: config.workers,
            timeout_secs: config.timeout_secs,
            targets: plan.targets().as_slice().to_vec(),
            output_dir: summary.output_dir.display().to_string(),
            results_file: summary.results_file.display().to_string(),
            screenshots: summary
                .screenshots
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            screenshot_count,
        }
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let ok = "[+]".green().bold();
        writeln!(w)?;
        write_rule(w)?;
        writeln!(w, "{} {}", ok, "Scan completed successfully!".green())?;
        writeln!(w, "{} Screenshots saved to: {}", ok, self.output_dir)?;
        writeln!(w, "{} Results file: {}", ok, self.results_file)?;

        if self.screenshot_count > 0 {
            writeln!(w, "{} Captured {} screenshot(s)", ok, self.screenshot_count)?;
        } else {
            writeln!(
                w,
                "{} {}",
                "[!]".yellow().bold(),
                "No screenshots were captured. This could mean:".yellow()
            )?;
            for cause in EMPTY_RESULT_CAUSES {
                writeln!(w, "    - {}", cause)?;
            }
        }
        write_rule(w)?;
        Ok(())
    }
}
