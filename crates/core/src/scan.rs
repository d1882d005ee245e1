//! Scan orchestration
//!
//! A run is split in two so callers can report between the steps:
//!
//! 1. [`ScanPlan::prepare`] resolves targets, creates the output directory
//!    and assembles the scanner command line. Nothing is spawned.
//! 2. [`ScanPlan::run`] hands the command line to a [`ScannerRunner`], waits
//!    for it, and inspects the output directory.
//!
//! Every error is terminal for the run; nothing is retried.

use std::path::PathBuf;

use tracing::info;

use crate::error::RdpshotError;
use crate::output_dir::{prepare_output_dir, results_file};
use crate::scanner::{ScannerInvocation, ScannerRunner};
use crate::summary::ScanSummary;
use crate::target::TargetList;

/// User input for a single run, after defaults have been applied.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Positional host/IP targets
    pub targets: Vec<String>,
    /// File of newline-separated targets
    pub target_file: Option<PathBuf>,
    /// Connection URL template (before `@` fix-up)
    pub url: String,
    pub workers: u32,
    pub timeout_secs: u32,
    /// Explicit output directory; `None` means timestamped
    pub output_dir: Option<PathBuf>,
    /// Scanner executable
    pub scanner_path: PathBuf,
}

/// Immutable configuration of a prepared run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Connection URL template as given
    pub url: String,
    pub workers: u32,
    pub timeout_secs: u32,
    pub output_dir: PathBuf,
    pub output_file: PathBuf,
    pub scanner_path: PathBuf,
}

/// A run that is ready to execute.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    config: ScanConfig,
    targets: TargetList,
    invocation: ScannerInvocation,
}

impl ScanPlan {
    /// Validate targets, create the output directory and build the invocation.
    ///
    /// # Errors
    ///
    /// - `ScanError::TargetFileNotFound` / `ScanError::NoTargets` from target resolution
    /// - `RdpshotError::Io` if the output directory cannot be created
    pub fn prepare(request: ScanRequest) -> Result<Self, RdpshotError> {
        let targets = TargetList::resolve(request.target_file.as_deref(), &request.targets)?;

        let output_dir = prepare_output_dir(request.output_dir.as_deref())?;
        let output_file = results_file(&output_dir);

        let invocation = ScannerInvocation::new(
            request.scanner_path.clone(),
            &request.url,
            request.workers,
            request.timeout_secs,
            &output_file,
            &targets,
        );

        let config = ScanConfig {
            url: request.url,
            workers: request.workers,
            timeout_secs: request.timeout_secs,
            output_dir,
            output_file,
            scanner_path: request.scanner_path,
        };

        Ok(Self {
            config,
            targets,
            invocation,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    pub fn invocation(&self) -> &ScannerInvocation {
        &self.invocation
    }

    /// Run the scanner to completion and summarize the output directory.
    pub async fn run<R: ScannerRunner>(&self, runner: &R) -> Result<ScanSummary, RdpshotError> {
        info!(
            workers = self.config.workers,
            timeout_secs = self.config.timeout_secs,
            targets = self.targets.len(),
            output_dir = %self.config.output_dir.display(),
            "starting scan"
        );

        runner.run(&self.invocation).await?;

        let summary = ScanSummary::collect(&self.config.output_dir, &self.config.output_file)?;
        info!(screenshots = summary.screenshot_count(), "scan finished");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::scanner::MockScannerRunner;
    use std::path::Path;
    use tempfile::TempDir;

    fn request(dir: &Path, targets: &[&str]) -> ScanRequest {
        ScanRequest {
            targets: targets.iter().map(|s| (*s).to_owned()).collect(),
            target_file: None,
            url: "rdp://".to_owned(),
            workers: 10,
            timeout_secs: 10,
            output_dir: Some(dir.join("out")),
            scanner_path: PathBuf::from("/opt/rdpshot/venv/bin/ardpscan"),
        }
    }

    #[test]
    fn prepare_without_targets_fails_before_creating_dir() {
        let tmp = TempDir::new().unwrap();
        let err = ScanPlan::prepare(request(tmp.path(), &[])).unwrap_err();
        assert!(matches!(err, RdpshotError::Scan(ScanError::NoTargets)));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn prepare_with_missing_target_file_fails() {
        let tmp = TempDir::new().unwrap();
        let mut req = request(tmp.path(), &[]);
        req.target_file = Some(tmp.path().join("missing.txt"));

        let err = ScanPlan::prepare(req).unwrap_err();
        match err {
            RdpshotError::Scan(ScanError::TargetFileNotFound { path }) => {
                assert!(path.ends_with("missing.txt"));
            }
            other => panic!("expected TargetFileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn prepare_builds_default_invocation() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();

        let output_file = tmp.path().join("out").join("screenshots.tsv");
        let expected: Vec<String> = vec![
            "-s".into(),
            "screen".into(),
            "-w".into(),
            "10".into(),
            "-t".into(),
            "10".into(),
            "-o".into(),
            output_file.display().to_string(),
            "rdp://".into(),
            "10.0.0.5".into(),
        ];
        assert_eq!(plan.invocation().args(), expected.as_slice());
        assert_eq!(plan.config().output_file, output_file);
        assert!(plan.config().output_dir.is_dir());
    }

    #[test]
    fn prepare_keeps_url_template_in_config() {
        let tmp = TempDir::new().unwrap();
        let mut req = request(tmp.path(), &["10.0.0.5"]);
        req.url = r"rdp+ntlm-password://DOMAIN\user:pass".to_owned();

        let plan = ScanPlan::prepare(req).unwrap();
        assert_eq!(plan.config().url, r"rdp+ntlm-password://DOMAIN\user:pass");
        assert_eq!(
            plan.invocation().args()[8],
            r"rdp+ntlm-password://DOMAIN\user:pass@"
        );
    }

    #[test]
    fn prepare_puts_target_file_before_literals() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("targets.txt");
        std::fs::write(&file, "10.0.0.1\n").unwrap();
        let mut req = request(tmp.path(), &["10.0.0.7", "10.0.0.8"]);
        req.target_file = Some(file.clone());

        let plan = ScanPlan::prepare(req).unwrap();
        let args = plan.invocation().args();
        assert_eq!(args[9], file.display().to_string());
        assert_eq!(&args[10..], ["10.0.0.7", "10.0.0.8"]);
    }

    #[test]
    fn prepare_reuses_existing_output_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("out")).unwrap();

        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"]));
        assert!(plan.is_ok());
    }

    #[tokio::test]
    async fn run_counts_screenshots() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();
        let runner = MockScannerRunner::new().with_screenshots(4);

        let summary = plan.run(&runner).await.unwrap();
        assert_eq!(runner.call_count(), 1);
        assert_eq!(summary.screenshot_count(), 4);
        assert_eq!(summary.results_file, plan.config().output_file);
    }

    #[tokio::test]
    async fn run_with_no_screenshots_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();
        let runner = MockScannerRunner::new();

        let summary = plan.run(&runner).await.unwrap();
        assert_eq!(summary.screenshot_count(), 0);
    }

    #[tokio::test]
    async fn run_passes_invocation_to_runner() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();
        let runner = MockScannerRunner::new();

        plan.run(&runner).await.unwrap();
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), [plan.invocation().clone()]);
    }

    #[tokio::test]
    async fn run_surfaces_missing_scanner() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();
        let runner = MockScannerRunner::new().with_missing_executable();

        let err = plan.run(&runner).await.unwrap_err();
        match err {
            RdpshotError::Scan(ScanError::ScannerNotFound { path }) => {
                assert_eq!(path, "/opt/rdpshot/venv/bin/ardpscan");
            }
            other => panic!("expected ScannerNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_surfaces_scanner_failure() {
        let tmp = TempDir::new().unwrap();
        let plan = ScanPlan::prepare(request(tmp.path(), &["10.0.0.5"])).unwrap();
        let runner = MockScannerRunner::new()
            .with_screenshots(2)
            .with_failure("exit status: 1");

        let err = plan.run(&runner).await.unwrap_err();
        assert!(matches!(
            err,
            RdpshotError::Scan(ScanError::ScannerFailed { .. })
        ));
    }
}
