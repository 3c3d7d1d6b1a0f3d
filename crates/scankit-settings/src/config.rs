//! Configuration and settings management for ScanKit
//!
//! Provides configuration file handling, settings management, and
//! validation. Settings are stored as TOML in the platform-specific
//! config directory.
//!
//! Configuration is organized into logical sections:
//! - Language defaults for new projects
//! - AI collaborator endpoints (OCR, translation, inpainting)
//! - Editor preferences
//! - Export defaults

use std::path::{Path, PathBuf};

use scankit_core::ExportQuality;
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

/// Default language pair for new projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSettings {
    /// BCP-47 tag of the source language.
    pub source_lang: String,
    /// BCP-47 tag of the target language.
    pub target_lang: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            source_lang: "ja".to_string(),
            target_lang: "en".to_string(),
        }
    }
}

/// AI collaborator service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Base URL of the OCR endpoint.
    pub ocr_endpoint: String,
    /// Base URL of the translation endpoint.
    pub translate_endpoint: String,
    /// Base URL of the inpainting endpoint.
    pub inpaint_endpoint: String,
    /// Base URL of the persistence API.
    pub persistence_endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional bearer token for the AI services.
    pub api_key: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            ocr_endpoint: "http://localhost:8700/api/ocr".to_string(),
            translate_endpoint: "http://localhost:8700/api/translate".to_string(),
            inpaint_endpoint: "http://localhost:8700/api/inpaint".to_string(),
            persistence_endpoint: "http://localhost:8700/api".to_string(),
            timeout_secs: 120,
            api_key: None,
        }
    }
}

/// Editor preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Font family for newly created text blocks.
    pub default_font_family: String,
    /// Font size for newly created text blocks.
    pub default_font_size: f64,
    /// Show the original page layer under the cleaned one.
    pub show_original_layer: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_font_family: "Arial".to_string(),
            default_font_size: 16.0,
            show_original_layer: true,
        }
    }
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportSettings {
    /// Raster quality preset.
    pub quality: ExportQuality,
    /// Directory exports are written to; defaults to the working dir.
    pub output_dir: Option<PathBuf>,
}

/// Complete ScanKit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanKitConfig {
    #[serde(default)]
    pub languages: LanguageSettings,
    #[serde(default)]
    pub services: ServiceSettings,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

impl ScanKitConfig {
    /// Platform config file location (`<config_dir>/scankit/config.toml`).
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))?;
        Ok(base.join("scankit").join("config.toml"))
    }

    /// Loads the configuration from the given file, falling back to
    /// defaults when the file does not exist.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the default platform location.
    pub fn load_default() -> SettingsResult<Self> {
        Self::load(&Self::default_path()?)
    }

    /// Saves the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| SettingsError::SaveError(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.services.timeout_secs == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "services.timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.editor.default_font_size <= 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "editor.default_font_size".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.languages.source_lang.trim().is_empty()
            || self.languages.target_lang.trim().is_empty()
        {
            return Err(SettingsError::InvalidSetting {
                key: "languages".to_string(),
                reason: "language tags must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ScanKitConfig::default();
        config.languages.target_lang = "de".to_string();
        config.export.quality = ExportQuality::Print;
        config.save(&path).unwrap();

        let loaded = ScanKitConfig::load(&path).unwrap();
        assert_eq!(loaded.languages.target_lang, "de");
        assert_eq!(loaded.export.quality, ExportQuality::Print);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanKitConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.languages.source_lang, "ja");
        assert_eq!(config.export.quality, ExportQuality::Standard);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = ScanKitConfig::default();
        config.services.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[languages]\nsource_lang = \"ko\"\ntarget_lang = \"en\"\n").unwrap();

        let loaded = ScanKitConfig::load(&path).unwrap();
        assert_eq!(loaded.languages.source_lang, "ko");
        assert_eq!(loaded.services.timeout_secs, 120);
    }
}
