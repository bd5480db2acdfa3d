use crate::error::{ConfigError, ConfigResult};
use crate::settings::{DefaultFormatSettings, DetectionSettings, LimitSettings, LogSettings, SaveSettings};
use quill_fs::{FormatDescriptor, LoadOptions, SaveOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;
use std::path::{Path, PathBuf};

/// Main configuration structure for the quill editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing surface capacity
    pub limits: LimitSettings,
    /// Encoding detection heuristics
    pub detection: DetectionSettings,
    /// Format for new documents
    pub defaults: DefaultFormatSettings,
    /// Save behavior
    pub save: SaveSettings,
    /// Logging
    pub log: LogSettings,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Export configuration as TOML string
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get configuration file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User-specific config
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(&home).join(".quill").join("config.toml"));
            paths.push(PathBuf::from(&home).join(".config").join("quill").join("config.toml"));
        }

        // System-wide config
        paths.push(PathBuf::from("/etc/quill/config.toml"));

        // Current directory
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(".quill.toml"));
            paths.push(current_dir.join("quill.toml"));
        }

        paths
    }

    /// Load configuration with automatic path discovery
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_paths(&Self::config_paths())
    }

    /// Load configuration with custom search paths
    pub fn load_with_paths(paths: &[PathBuf]) -> ConfigResult<Self> {
        for path in paths {
            if path.exists() {
                debug!(path = %path.display(), "loading configuration");
                return Self::from_file(path);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.limits.max_chars == 0 {
            return Err(ConfigError::Validation("max_chars must be greater than 0".to_string()));
        }
        if self.detection.sample_units == 0 {
            return Err(ConfigError::Validation(
                "sample_units must be greater than 0".to_string(),
            ));
        }
        if !(self.detection.ascii_ratio > 0.0 && self.detection.ascii_ratio <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "ascii_ratio must be in (0, 1], got {}",
                self.detection.ascii_ratio
            )));
        }
        if self.save.buffer_size == 0 {
            return Err(ConfigError::Validation("buffer_size must be greater than 0".to_string()));
        }
        if self.save.atomic && self.save.temp_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "temp_suffix must not be empty when atomic saves are on".to_string(),
            ));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Validation("log level must not be empty".to_string()));
        }
        Ok(())
    }

    /// Options for loading documents under this configuration
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_chars: self.limits.max_chars,
            detection: self.detection.to_detection_config(),
        }
    }

    /// Options for saving documents under this configuration
    pub fn save_options(&self) -> SaveOptions {
        self.save.to_save_options()
    }

    /// Format for brand-new documents
    pub fn default_format(&self) -> FormatDescriptor {
        self.defaults.format()
    }
}

/// Configuration builder for creating custom configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.config.limits.max_chars = max_chars;
        self
    }

    pub fn detection<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut DetectionSettings),
    {
        f(&mut self.config.detection);
        self
    }

    pub fn default_format(mut self, format: FormatDescriptor) -> Self {
        self.config.defaults = DefaultFormatSettings {
            encoding: format.encoding,
            line_ending: format.line_ending,
            bom: format.has_bom,
        };
        self
    }

    pub fn save<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut SaveSettings),
    {
        f(&mut self.config.save);
        self
    }

    pub fn log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.config.log.level = level.into();
        self
    }

    pub fn build(self) -> ConfigResult<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
