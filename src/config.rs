//! Runtime configuration loaded from YAML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowquizError};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "showquiz.yaml";

const DEFAULT_DATABASE: &str = "showquiz.db";

/// Host and port for one of the HTTP servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn with_port(port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file
    pub database: PathBuf,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    pub questions_per_page: usize,
    pub trivia: ServerConfig,
    pub booking: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            log_level: "info".to_string(),
            questions_per_page: crate::selector::QUESTIONS_PER_PAGE,
            trivia: ServerConfig::with_port(5000),
            booking: ServerConfig::with_port(5001),
        }
    }
}

impl Config {
    /// Parse a config from YAML text. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or `showquiz.yaml` from `dir` if it exists.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ShowquizError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = fs::read_to_string(&path)?;
        Self::from_yaml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.questions_per_page == 0 {
            return Err(ShowquizError::Config(
                "questions_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database, PathBuf::from("showquiz.db"));
        assert_eq!(config.questions_per_page, 10);
        assert_eq!(config.trivia.addr(), "127.0.0.1:5000");
        assert_eq!(config.booking.addr(), "127.0.0.1:5001");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("database: /tmp/quiz.db\ntrivia:\n  host: 0.0.0.0\n  port: 8080\n").unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/quiz.db"));
        assert_eq!(config.trivia.addr(), "0.0.0.0:8080");
        assert_eq!(config.booking.port, 5001);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = Config::from_yaml("questions_per_page: 0\n");
        assert!(matches!(result, Err(ShowquizError::Config(_))));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(None, tmp.path()).unwrap();
        assert_eq!(config.database, PathBuf::from("showquiz.db"));
    }

    #[test]
    fn test_load_picks_up_file_in_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DEFAULT_CONFIG_FILE), "log_level: debug\n").unwrap();
        let config = Config::load(None, tmp.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(Some(&tmp.path().join("nope.yaml")), tmp.path());
        assert!(matches!(result, Err(ShowquizError::Config(_))));
    }
}
