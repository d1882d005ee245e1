//! Output directory handling
//!
//! The scanner writes its manifest and screenshots next to the output file
//! it is given, so the directory must exist before the scanner starts.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

/// Prefix of generated output directory names.
pub const OUTPUT_DIR_PREFIX: &str = "rdp_screenshots_";

/// Name of the scanner's tab-separated results manifest.
pub const RESULTS_FILE_NAME: &str = "screenshots.tsv";

/// Directory name derived from a timestamp: `rdp_screenshots_YYYYMMDD_HHMMSS`.
pub fn timestamped_dir_name(now: DateTime<Local>) -> String {
    format!("{}{}", OUTPUT_DIR_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// Resolve and create the output directory.
///
/// Uses `requested` when given, otherwise a timestamped directory relative to
/// the working directory. Creation tolerates a directory that already exists.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created
/// (permissions, a regular file in the way, ...).
pub fn prepare_output_dir(requested: Option<&Path>) -> std::io::Result<PathBuf> {
    let dir = match requested {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(timestamped_dir_name(Local::now())),
    };

    std::fs::create_dir_all(&dir)?;
    debug!(dir = %dir.display(), "output directory ready");
    Ok(dir)
}

/// Path of the results manifest inside `output_dir`.
pub fn results_file(output_dir: &Path) -> PathBuf {
    output_dir.join(RESULTS_FILE_NAME)
}
