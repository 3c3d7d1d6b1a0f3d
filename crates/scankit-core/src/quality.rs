//! Export quality presets shared between settings and the exporter.

use serde::{Deserialize, Serialize};

/// Raster export quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    /// 1x page-logical resolution.
    Standard,
    /// 1.5x resolution.
    High,
    /// 2x resolution for print.
    Print,
}

impl ExportQuality {
    /// Raster scale factor relative to page-logical size.
    pub fn scale(&self) -> f64 {
        match self {
            ExportQuality::Standard => 1.0,
            ExportQuality::High => 1.5,
            ExportQuality::Print => 2.0,
        }
    }
}

impl Default for ExportQuality {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::High => write!(f, "high"),
            Self::Print => write!(f, "print"),
        }
    }
}
