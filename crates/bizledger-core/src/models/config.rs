//! Configuration structures for rendering, asset loading and session scoping.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for bizledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document rendering configuration.
    pub render: RenderConfig,

    /// Signature/attachment loading configuration.
    pub assets: AssetConfig,

    /// Which user and business the session acts for.
    pub session: SessionConfig,
}

/// Paper size for PDF output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in PDF points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

/// Document rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// PDF paper size.
    pub page_size: PageSize,

    /// Insert thousands separators in amounts.
    pub group_thousands: bool,

    /// chrono format string for dates on documents.
    pub date_format: String,

    /// Image shown in HTML when a signature or attachment is unavailable.
    pub placeholder_image_url: String,

    /// Document title for sales.
    pub sale_title: String,

    /// Document title for purchases.
    pub purchase_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            group_thousands: false,
            date_format: "%d %b %Y".to_string(),
            placeholder_image_url: "https://via.placeholder.com/150?text=Image+unavailable"
                .to_string(),
            sale_title: "Sales Invoice".to_string(),
            purchase_title: "Purchase Invoice".to_string(),
        }
    }
}

/// Signature and attachment loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Per-image fetch timeout.
    pub timeout_ms: u64,

    /// Largest image accepted, in bytes.
    pub max_bytes: usize,

    /// Directory relative image paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_bytes: 5 * 1024 * 1024,
            base_dir: None,
        }
    }
}

/// Session scoping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Signed-in user, used to find the owned business.
    pub user_id: Option<String>,

    /// Business to act for. When `user_id` is also set it must own it.
    pub business_id: Option<String>,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"render": {"group_thousands": true}}"#).unwrap();
        assert!(config.render.group_thousands);
        assert_eq!(config.render.sale_title, "Sales Invoice");
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.session.business_id = Some("biz-1".to_string());
        config.render.page_size = PageSize::Letter;
        config.save(&path).unwrap();

        assert_eq!(AppConfig::from_file(&path).unwrap(), config);
    }
}
