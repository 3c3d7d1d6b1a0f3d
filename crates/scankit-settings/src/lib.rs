//! # ScanKit Settings
//!
//! Configuration management: TOML settings in the platform config
//! directory, organized into language, service, editor, and export
//! sections with validation.

pub mod config;
pub mod error;

pub use config::{
    EditorSettings, ExportSettings, LanguageSettings, ScanKitConfig, ServiceSettings,
};
pub use error::{SettingsError, SettingsResult};
