//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.instdoc.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".instdoc.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Documentation link settings.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Library aggregation settings.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Instances version being documented.
    #[serde(default = "default_version")]
    pub version: String,

    /// Root folder for generated documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_version() -> String {
    "latest".to_string()
}

fn default_output_dir() -> String {
    "target".to_string()
}

/// Published documentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Site root that cross-reference links point into.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://openminds-documentation.readthedocs.io/en".to_string()
}

/// File scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Extension of instance files.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Names to exclude.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            excludes: default_excludes(),
        }
    }
}

fn default_extension() -> String {
    "jsonld".to_string()
}

fn default_excludes() -> Vec<String> {
    vec![".git", "node_modules", "target"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Library aggregation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Common types collected from `graphStructures/common/<type>`.
    /// Documents of other common types are dropped.
    #[serde(default)]
    pub common_types: Vec<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref version) = args.instances_version {
            self.general.version = version.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output_dir = output.to_string_lossy().to_string();
        }
        if let Some(ref base_url) = args.base_url {
            self.docs.base_url = base_url.clone();
        }
        if let Some(ref extension) = args.extension {
            self.scanner.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(ref excludes) = args.exclude {
            self.scanner.excludes = excludes.clone();
        }
        if let Some(ref common_types) = args.common_types {
            self.library.common_types = common_types.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values the CLI cannot validate on its own.
    pub fn validate(&self) -> Result<(), String> {
        let version = self.general.version.trim();
        if version.is_empty() {
            return Err("Instances version must not be empty".to_string());
        }
        if version.contains(['/', '\\']) || version == ".." {
            return Err(format!(
                "Instances version must not contain path separators: {}",
                version
            ));
        }

        let base_url = &self.docs.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err("Base URL must start with 'http://' or 'https://'".to_string());
        }

        if self.scanner.extension.is_empty() {
            return Err("Instance file extension must not be empty".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.version, "latest");
        assert_eq!(config.general.output_dir, "target");
        assert_eq!(config.scanner.extension, "jsonld");
        assert!(config.library.common_types.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
version = "v3.0"
verbose = true

[docs]
base_url = "https://docs.example.org/en/"

[library]
common_types = ["organization"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.version, "v3.0");
        assert_eq!(config.general.output_dir, "target");
        assert!(config.general.verbose);
        assert_eq!(config.docs.base_url, "https://docs.example.org/en/");
        assert_eq!(config.scanner.extension, "jsonld");
        assert_eq!(config.library.common_types, vec!["organization"]);
    }

    #[test]
    fn test_validate_rejects_path_like_version() {
        let mut config = Config::default();
        config.general.version = "../etc".to_string();
        assert!(config.validate().is_err());

        config.general.version = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.docs.base_url = "ftp://docs.example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[docs]"));
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[library]"));
    }
}
