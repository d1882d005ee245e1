//! Post-scan inspection of the output directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

/// File extensions counted as captured screenshots (compared case-insensitively).
pub const SCREENSHOT_EXTENSIONS: &[&str] = &["png"];

/// Result of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Directory the scanner wrote into
    pub output_dir: PathBuf,
    /// Scanner results manifest (never parsed)
    pub results_file: PathBuf,
    /// Screenshot files found directly inside `output_dir`, sorted
    pub screenshots: Vec<PathBuf>,
}

impl ScanSummary {
    /// Inspect `output_dir` for screenshots.
    pub fn collect(output_dir: &Path, results_file: &Path) -> std::io::Result<Self> {
        let screenshots = find_screenshots(output_dir)?;
        debug!(dir = %output_dir.display(), count = screenshots.len(), "collected screenshots");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            results_file: results_file.to_path_buf(),
            screenshots,
        })
    }

    pub fn screenshot_count(&self) -> usize {
        self.screenshots.len()
    }
}

/// List screenshot files directly inside `dir` (non-recursive).
pub fn find_screenshots(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if is_screenshot(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn is_screenshot(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCREENSHOT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_dir_has_no_screenshots() {
        let tmp = TempDir::new().unwrap();
        assert!(find_screenshots(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn counts_png_files_only() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("10.0.0.1.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("10.0.0.2.PNG"), b"x").unwrap();
        std::fs::write(tmp.path().join("screenshots.tsv"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let found = find_screenshots(tmp.path()).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn ignores_nested_directories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("older.png");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("10.0.0.1.png"), b"x").unwrap();

        assert!(find_screenshots(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn results_are_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.png", "a.png", "b.png"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let found = find_screenshots(tmp.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn summary_reports_count() {
        let tmp = TempDir::new().unwrap();
        for i in 0..3 {
            std::fs::write(tmp.path().join(format!("{i}.png")), b"x").unwrap();
        }
        let results = tmp.path().join("screenshots.tsv");

        let summary = ScanSummary::collect(tmp.path(), &results).unwrap();
        assert_eq!(summary.screenshot_count(), 3);
        assert_eq!(summary.results_file, results);
    }

    #[test]
    fn summary_serializes_paths() {
        let summary = ScanSummary {
            output_dir: PathBuf::from("out"),
            results_file: PathBuf::from("out/screenshots.tsv"),
            screenshots: vec![PathBuf::from("out/10.0.0.5.png")],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["output_dir"], "out");
        assert_eq!(value["screenshots"][0], "out/10.0.0.5.png");
    }

    #[test]
    fn missing_dir_is_an_error() {
        assert!(find_screenshots(Path::new("/nonexistent/rdp_screenshots")).is_err());
    }
}
