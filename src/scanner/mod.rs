//! File scanner for discovering instance documents.
//!
//! This module walks the input root and returns every file with the
//! configured extension, skipping hidden and excluded entries.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Extension of instance files, without the dot.
    pub extension: String,
    /// Directory or file names to skip (e.g., [".git", "schemas"])
    pub excludes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "jsonld".to_string(),
            excludes: vec![".git".to_string()],
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            excludes: config.excludes.clone(),
        }
    }
}

/// File scanner for discovering instance documents.
pub struct FileScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for all matching files, in a stable order.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to walk {}", self.root.display()))?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} instance files under {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Check if a file has the instance extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext == self.config.extension)
            .unwrap_or(false)
    }

    /// Check if an entry matches exclusion patterns.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}
