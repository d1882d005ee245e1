//! CLI argument parsing using clap derive API
//!
//! Flags are the top configuration layer: [`Cli::apply_overrides`] writes the
//! ones that were given over the file and env layers before validation.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use rdpshot_core::config::RdpshotConfig;

const EXAMPLES: &str = r#"Examples:
  # Single target
  rdpshot 192.168.1.100

  # Multiple targets from command line
  rdpshot 192.168.1.100 192.168.1.101 192.168.1.102

  # Targets from file (one per line)
  rdpshot -f targets.txt

  # With authentication (NTLM)
  rdpshot -u "rdp+ntlm-password://DOMAIN\user:pass@" 192.168.1.100

  # Custom workers and timeout
  rdpshot -w 50 -t 15 -f targets.txt

Note: For capturing login screens, use 'rdp://' (no authentication).
      This only works when NLA (Network Level Authentication) is disabled."#;

/// Capture RDP login screen screenshots.
///
/// Runs the bundled `ardpscan` scanner against the given targets and
/// collects its screenshots in an output directory.
#[derive(Parser, Debug)]
#[command(name = "rdpshot", version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Target IP addresses or hostnames.
    pub targets: Vec<String>,

    /// File containing target IPs/hostnames (one per line).
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// RDP connection URL template (default: rdp://).
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Number of parallel workers (default: 10).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: Option<u32>,

    /// Connection timeout in seconds (default: 10).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub timeout: Option<u32>,

    /// Output directory (default: rdp_screenshots_TIMESTAMP).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to an rdpshot.toml configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scanner executable (default: <install dir>/venv/bin/ardpscan).
    #[arg(long, value_name = "PATH")]
    pub scanner: Option<PathBuf>,

    /// Print the scanner command line without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Summary format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overwrite config values with the flags that were given.
    pub fn apply_overrides(&self, config: &mut RdpshotConfig) {
        if let Some(url) = &self.url {
            config.scan.url = url.clone();
        }
        if let Some(workers) = self.workers {
            config.scan.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.scan.timeout_secs = timeout;
        }
        if let Some(scanner) = &self.scanner {
            config.scan.scanner_path = scanner.display().to_string();
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output.
    Text,
    /// Machine-readable JSON.
    Json,
}
