//! Target resolution
//!
//! The scanner accepts host literals and target-file paths interchangeably,
//! so resolution only checks that something was given and that a target
//! file exists. Host syntax is left to the scanner.

use std::path::Path;

use tracing::debug;

use crate::error::ScanError;

/// Ordered list of scanner targets.
///
/// A target file path (if any) comes first, followed by literal targets in
/// the order they were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList(Vec<String>);

impl TargetList {
    /// Build the list from an optional target file and positional targets.
    ///
    /// # Errors
    ///
    /// - `ScanError::TargetFileNotFound` if `file` is given but does not exist
    /// - `ScanError::NoTargets` if the resulting list is empty
    pub fn resolve(file: Option<&Path>, targets: &[String]) -> Result<Self, ScanError> {
        let mut entries = Vec::with_capacity(targets.len() + 1);

        if let Some(file) = file {
            if !file.exists() {
                return Err(ScanError::TargetFileNotFound {
                    path: file.display().to_string(),
                });
            }
            entries.push(file.display().to_string());
        }

        entries.extend(targets.iter().cloned());

        if entries.is_empty() {
            return Err(ScanError::NoTargets);
        }

        debug!(count = entries.len(), "resolved targets");
        Ok(Self(entries))
    }

    /// Number of entries (hosts and files combined).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a resolved list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
