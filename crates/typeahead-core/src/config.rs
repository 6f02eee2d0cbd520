use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_USER_AGENT;
use crate::controller::ControllerOptions;
use crate::error::{Result, TypeaheadError};

/// Root application configuration, loaded from `~/.config/typeahead/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub page_size: usize,
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub debounce_ms: u64,
    /// Ignore responses to requests older than the last one applied.
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            page_size: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            discard_stale_responses: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/typeahead/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("TYPEAHEAD_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("typeahead")
            .join("config.toml")
    }

    /// Load config from `path`, falling back to defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.service.base_url.starts_with("http://")
            && !self.service.base_url.starts_with("https://")
        {
            return Err(TypeaheadError::Config(format!(
                "service.base_url must be an http(s) URL, got {:?}",
                self.service.base_url
            )));
        }
        if self.service.page_size == 0 {
            return Err(TypeaheadError::Config(
                "service.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // ─── Derived values ────────────────────────────────────

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.input.debounce_ms)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            debounce: self.debounce_delay(),
            page_size: self.service.page_size,
            discard_stale_responses: self.input.discard_stale_responses,
        }
    }

    /// Log file path: `logging.file`, or `~/.local/share/typeahead/typeahead.log`.
    pub fn log_path(&self) -> PathBuf {
        match &self.logging.file {
            Some(file) => PathBuf::from(file),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("typeahead")
                .join("typeahead.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.service.base_url, "http://localhost:8000");
        assert_eq!(cfg.service.page_size, 5);
        assert_eq!(cfg.input.debounce_ms, 300);
        assert!(!cfg.input.discard_stale_responses);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.service.base_url = "https://suggest.example.com".to_string();
        cfg.service.timeout_ms = Some(1500);
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.service.base_url, "https://suggest.example.com");
        assert_eq!(loaded.service.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(loaded.input.debounce_ms, cfg.input.debounce_ms);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[input]\ndebounce_ms = 150\n").unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.input.debounce_ms, 150);
        assert_eq!(cfg.service.page_size, 5);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_typeahead_config.toml")).unwrap();
        assert_eq!(cfg.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[service]\nbase_url = \"localhost:8000\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(TypeaheadError::Config(_))
        ));

        std::fs::write(&path, "[service]\npage_size = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(TypeaheadError::Config(_))
        ));
    }

    #[test]
    fn test_controller_options_follow_config() {
        let mut cfg = AppConfig::default();
        cfg.input.debounce_ms = 120;
        cfg.input.discard_stale_responses = true;
        cfg.service.page_size = 8;

        let opts = cfg.controller_options();
        assert_eq!(opts.debounce, Duration::from_millis(120));
        assert_eq!(opts.page_size, 8);
        assert!(opts.discard_stale_responses);
    }

    #[test]
    fn test_log_path_override() {
        let mut cfg = AppConfig::default();
        assert!(cfg.log_path().to_string_lossy().ends_with("typeahead.log"));
        cfg.logging.file = Some("/var/tmp/ta.log".to_string());
        assert_eq!(cfg.log_path(), PathBuf::from("/var/tmp/ta.log"));
    }
}
