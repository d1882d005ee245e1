//! Delegated scanner invocation.
//!
//! All network work (RDP handshake, NLA negotiation, screen capture, worker
//! pool) happens inside the external `ardpscan` executable. This module only
//! builds its command line and runs it.
//!
//! The [`ScannerRunner`] trait is the seam between the orchestrator and the
//! process: production code uses [`ProcessScannerRunner`], tests use
//! `MockScannerRunner`.
//!
//! ```text
//!   ScanPlan ──▶ ScannerRunner (trait)
//!                   │        │
//!                   ▼        ▼
//!               Process    Mock
//!                   │
//!                   ▼
//!               ardpscan -s screen -w N -t N -o <file> <url> <targets...>
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::error::{RdpshotError, ScanError};
use crate::target::TargetList;
use crate::url::normalize_url;

/// Scanner location relative to the directory holding the rdpshot binary.
#[cfg(not(windows))]
const SCANNER_RELATIVE_PATH: [&str; 3] = ["venv", "bin", "ardpscan"];
#[cfg(windows)]
const SCANNER_RELATIVE_PATH: [&str; 3] = ["venv", "Scripts", "ardpscan.exe"];

/// Output mode flag value that makes the scanner capture screenshots.
const SCREEN_MODE: &str = "screen";

/// Default scanner path: `<exe dir>/venv/bin/ardpscan`.
pub fn default_scanner_path() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let base = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(SCANNER_RELATIVE_PATH
        .iter()
        .fold(base.to_path_buf(), |path, part| path.join(part)))
}

/// A fully assembled scanner command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerInvocation {
    program: PathBuf,
    args: Vec<String>,
}

impl ScannerInvocation {
    /// Assemble `-s screen -w <workers> -t <timeout> -o <output_file> <url> <targets...>`.
    ///
    /// The URL is passed through [`normalize_url`] first.
    pub fn new(
        program: impl Into<PathBuf>,
        url: &str,
        workers: u32,
        timeout_secs: u32,
        output_file: &Path,
        targets: &TargetList,
    ) -> Self {
        let mut args = Vec::with_capacity(9 + targets.len());
        args.extend([
            "-s".to_owned(),
            SCREEN_MODE.to_owned(),
            "-w".to_owned(),
            workers.to_string(),
            "-t".to_owned(),
            timeout_secs.to_string(),
            "-o".to_owned(),
            output_file.display().to_string(),
            normalize_url(url),
        ]);
        args.extend(targets.iter().map(str::to_owned));

        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Space-joined command line, for display only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs a scanner invocation to completion.
///
/// # Errors
///
/// - `ScanError::ScannerNotFound`: the executable does not exist
/// - `ScanError::ScannerFailed`: the process exited unsuccessfully
/// - `RdpshotError::Io`: any other spawn/wait failure
pub trait ScannerRunner: Send + Sync + 'static {
    fn run(
        &self,
        invocation: &ScannerInvocation,
    ) -> impl Future<Output = Result<(), RdpshotError>> + Send;
}

/// Spawns the scanner as a child process with inherited stdio and waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessScannerRunner {
    stdout_to_stderr: bool,
}

impl ProcessScannerRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the scanner's stdout to our stderr, keeping stdout free for
    /// machine-readable output.
    pub fn with_stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }
}

impl ScannerRunner for ProcessScannerRunner {
    async fn run(&self, invocation: &ScannerInvocation) -> Result<(), RdpshotError> {
        debug!(program = %invocation.program.display(), args = ?invocation.args, "spawning scanner");

        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };

        let status = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RdpshotError::Scan(ScanError::ScannerNotFound {
                        path: invocation.program.display().to_string(),
                    })
                } else {
                    RdpshotError::Io(e)
                }
            })?;

        if !status.success() {
            return Err(ScanError::ScannerFailed {
                detail: status.to_string(),
            }
            .into());
        }

        info!("scanner exited successfully");
        Ok(())
    }
}

/// Test runner that records invocations and returns a scripted outcome.
///
/// On success it can drop fake screenshot files into the output directory,
/// the way the real scanner would.
#[cfg(test)]
#[derive(Default)]
pub struct MockScannerRunner {
    /// Invocations received, in order
    pub calls: std::sync::Mutex<Vec<ScannerInvocation>>,
    /// Number of `.png` files written next to the output file on success
    pub screenshots: usize,
    /// Simulate a missing executable
    pub missing: bool,
    /// Simulate a non-zero exit with this detail
    pub failure: Option<String>,
}

#[cfg(test)]
impl MockScannerRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screenshots(mut self, count: usize) -> Self {
        self.screenshots = count;
        self
    }

    pub fn with_missing_executable(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn with_failure(mut self, detail: &str) -> Self {
        self.failure = Some(detail.to_owned());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[cfg(test)]
impl ScannerRunner for MockScannerRunner {
    async fn run(&self, invocation: &ScannerInvocation) -> Result<(), RdpshotError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(invocation.clone());

        if self.missing {
            return Err(ScanError::ScannerNotFound {
                path: invocation.program.display().to_string(),
            }
            .into());
        }
        if let Some(detail) = &self.failure {
            return Err(ScanError::ScannerFailed {
                detail: detail.clone(),
            }
            .into());
        }

        // `-o <file>` sits at index 7; screenshots land next to it.
        let output_file = PathBuf::from(&invocation.args[7]);
        let dir = output_file.parent().unwrap_or_else(|| Path::new("."));
        std::fs::write(&output_file, "ip\tstatus\n")?;
        for i in 0..self.screenshots {
            std::fs::write(dir.join(format!("10.0.0.{i}.png")), b"\x89PNG")?;
        }
        Ok(())
    }
}
