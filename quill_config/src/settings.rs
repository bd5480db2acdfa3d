use quill_fs::{DetectionConfig, Encoding, FormatDescriptor, LineEnding, SaveOptions};
use serde::{Deserialize, Serialize};

/// Size limits of the editing surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Maximum document length in UTF-16 units; files larger than twice
    /// this many bytes are refused
    pub max_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_chars: 32 * 1024 * 1024,
        }
    }
}

/// Tuning for the UTF-16 detection heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Leading 16-bit units inspected
    pub sample_units: usize,
    /// Share of ASCII-compatible units needed to call a buffer UTF-16
    pub ascii_ratio: f64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        let defaults = DetectionConfig::default();
        Self {
            sample_units: defaults.sample_units,
            ascii_ratio: defaults.ascii_ratio,
        }
    }
}

impl DetectionSettings {
    pub fn to_detection_config(&self) -> DetectionConfig {
        DetectionConfig {
            sample_units: self.sample_units,
            ascii_ratio: self.ascii_ratio,
        }
    }
}

/// Format given to documents that have never been saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFormatSettings {
    pub encoding: Encoding,
    pub line_ending: LineEnding,
    pub bom: bool,
}

impl Default for DefaultFormatSettings {
    fn default() -> Self {
        let format = FormatDescriptor::DEFAULT_SAVE;
        Self {
            encoding: format.encoding,
            line_ending: format.line_ending,
            bom: format.has_bom,
        }
    }
}

impl DefaultFormatSettings {
    pub fn format(&self) -> FormatDescriptor {
        FormatDescriptor::new(self.encoding, self.line_ending, self.bom)
    }
}

/// How documents are written back to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Write through a temp file and rename
    pub atomic: bool,
    /// Keep the permissions of the file being replaced (Unix only)
    pub preserve_permissions: bool,
    /// Appended to the file name for the atomic write's temp file
    pub temp_suffix: String,
    /// Write buffer capacity in bytes
    pub buffer_size: usize,
}

impl Default for SaveSettings {
    fn default() -> Self {
        let defaults = SaveOptions::default();
        Self {
            atomic: defaults.atomic_writes,
            preserve_permissions: defaults.preserve_permissions,
            temp_suffix: defaults.temp_suffix,
            buffer_size: defaults.buffer_size,
        }
    }
}

impl SaveSettings {
    pub fn to_save_options(&self) -> SaveOptions {
        SaveOptions {
            preserve_permissions: self.preserve_permissions,
            atomic_writes: self.atomic,
            temp_suffix: self.temp_suffix.clone(),
            buffer_size: self.buffer_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default `tracing` filter directive, overridden by `QUILL_LOG`
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_engine_constants() {
        assert_eq!(DefaultFormatSettings::default().format(), FormatDescriptor::DEFAULT_SAVE);
        assert_eq!(
            DetectionSettings::default().to_detection_config(),
            DetectionConfig::default()
        );
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let settings: DefaultFormatSettings = toml::from_str("bom = true").unwrap();
        assert!(settings.bom);
        assert_eq!(settings.encoding, Encoding::Utf8);
        assert_eq!(settings.line_ending, LineEnding::Windows);
    }

    #[test]
    fn test_encoding_names() {
        let settings: DefaultFormatSettings =
            toml::from_str("encoding = \"utf-16\"\nline_ending = \"unix\"").unwrap();
        assert_eq!(
            settings.format(),
            FormatDescriptor::new(Encoding::Utf16, LineEnding::Unix, false)
        );

        let settings: DefaultFormatSettings = toml::from_str("encoding = \"utf8\"\nline_ending = \"crlf\"").unwrap();
        assert_eq!(settings.encoding, Encoding::Utf8);
        assert_eq!(settings.line_ending, LineEnding::Windows);
    }

    #[test]
    fn test_save_settings_mirror_save_options() {
        assert_eq!(SaveSettings::default().to_save_options(), SaveOptions::default());

        let settings: SaveSettings = toml::from_str("temp_suffix = \".swp\"\nbuffer_size = 4096").unwrap();
        let options = settings.to_save_options();
        assert_eq!(options.temp_suffix, ".swp");
        assert_eq!(options.buffer_size, 4096);
        assert!(options.atomic_writes);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(toml::from_str::<DefaultFormatSettings>("encoding = \"latin1\"").is_err());
    }
}
