//! PromptRoll configuration types and loading

use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main PromptRoll configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database holding templates and history
    #[serde(rename = "store-path")]
    pub store_path: PathBuf,

    /// Directory for exports when no destination is given (default: current directory)
    #[serde(rename = "export-dir")]
    pub export_dir: Option<PathBuf>,

    /// Clipboard configuration
    pub clipboard: ClipboardConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            export_dir: None,
            clipboard: ClipboardConfig::default(),
            log_level: None,
        }
    }
}

/// Clipboard configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Copy command and arguments; text is written to its stdin.
    /// Unset means the platform default.
    pub command: Option<Vec<String>>,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptroll")
        .join("promptroll.db")
}

impl Config {
    /// Load configuration
    ///
    /// An explicit `--config` path must load. Otherwise the first readable
    /// `.promptroll.yml` in the working directory or
    /// `<config_dir>/promptroll/promptroll.yml` wins, and a broken candidate
    /// is skipped with a warning.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Cannot use config {}", path.display()));
        }

        for candidate in Self::candidates() {
            if !candidate.is_file() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %candidate.display(), "Skipping unreadable config: {:#}", e),
            }
        }

        tracing::debug!(store = %default_store_path().display(), "Config::load: no config file, using defaults");
        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".promptroll.yml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("promptroll").join("promptroll.yml"));
        }
        paths
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Config file is not readable")?;
        let config: Self = serde_yaml::from_str(&content).context("Config file is not valid PromptRoll YAML")?;
        tracing::info!(path = %path.display(), store = %config.store_path.display(), "Loaded config");
        Ok(config)
    }

    /// Export directory, falling back to the current directory
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.store_path.ends_with("promptroll/promptroll.db"));
        assert!(config.clipboard.command.is_none());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            "store-path: /tmp/prompts.db\nexport-dir: /tmp/exports\nlog-level: debug\nclipboard:\n  command: [xsel, --clipboard, --input]\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/prompts.db"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(
            config.clipboard.command,
            Some(vec!["xsel".to_string(), "--clipboard".to_string(), "--input".to_string()])
        );
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "log-level: warn\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path, default_store_path());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("nope.yml"))).is_err());
    }

    #[test]
    fn test_malformed_explicit_file_names_the_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "store-path: [not, a, path\n").unwrap();
        let err = format!("{:#}", Config::load(Some(&path)).unwrap_err());
        assert!(err.contains("Cannot use config"), "{}", err);
        assert!(err.contains("not valid PromptRoll YAML"), "{}", err);
    }
}
