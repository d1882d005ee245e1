//! # rdpshot-core
//!
//! Building blocks of the `rdpshot` RDP login-screen capture wrapper.
//!
//! The actual RDP work is done by the external `ardpscan` executable; this
//! crate resolves targets, prepares the output directory, assembles the
//! scanner command line, runs it, and counts the screenshots it produced.
//!
//! # Modules
//! - [`config`]: `rdpshot.toml` loading with env overrides
//! - [`error`]: domain error types
//! - [`target`]: target list resolution
//! - [`url`]: connection URL fix-up
//! - [`output_dir`]: output directory and results file naming
//! - [`scanner`]: scanner command line and the [`ScannerRunner`](scanner::ScannerRunner) seam
//! - [`summary`]: post-scan screenshot inspection
//! - [`scan`]: orchestration of a single run

pub mod config;
pub mod error;
pub mod output_dir;
pub mod scan;
pub mod scanner;
pub mod summary;
pub mod target;
pub mod url;

pub use config::RdpshotConfig;
pub use error::{ConfigError, RdpshotError, ScanError};
pub use scan::{ScanConfig, ScanPlan, ScanRequest};
pub use scanner::{ProcessScannerRunner, ScannerInvocation, ScannerRunner, default_scanner_path};
pub use summary::ScanSummary;
pub use target::TargetList;
