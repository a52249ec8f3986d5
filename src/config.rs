//! Configuration management (TOML)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Frame cadence of the headless driver.
    pub tick_interval_ms: u64,
    pub log_level: String,
    pub notify_on_export: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Live,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub interval_seconds: f64,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_pid: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub path: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            tick_interval_ms: 16,
            log_level: "info".to_string(),
            notify_on_export: true,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            interval_seconds: 1.0,
            source: SourceKind::Live,
            target_pid: None,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            capacity: crate::history::DEFAULT_CAPACITY,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            path: PathBuf::from(crate::exporter::DEFAULT_TRACE_FILE),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.sampling.interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sampling.interval_seconds must be positive, got {}",
                interval
            )));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if self.general.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "general.tick_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.export.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("export.path is empty".to_string()));
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs_f64(self.sampling.interval_seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.general.tick_interval_ms)
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "hazel-profiler")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
