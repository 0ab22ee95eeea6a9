//! Front-end configuration, loaded from TOML.
//!
//! ```toml
//! scope = "music"
//! format = "json"
//!
//! [search]
//! debounce_ms = 250
//! limit = 25
//! ```
//!
//! Every field is optional; missing ones fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use store_search::{Scope, SearchConfig};

use crate::error::{Result, StorefrontError};

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Section headers followed by indented items.
    #[default]
    Text,
    /// One JSON object per snapshot, one per line.
    Json,
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Scope selected at startup.
    pub scope: Scope,
    pub format: OutputFormat,
    /// Settings handed to the search core.
    pub search: SearchConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            scope: Scope::All,
            format: OutputFormat::Text,
            search: SearchConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| StorefrontError::Config(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| StorefrontError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/storefront/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("storefront")
            .join("config.toml")
    }

    /// Load from `path` if given, else from the default path if it exists,
    /// else use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.scope, Scope::All);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            scope = "music"

            [search]
            debounce_ms = 150
            "#,
        )
        .expect("parse");
        assert_eq!(config.scope, Scope::Music);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.limit, 20);
    }

    #[test]
    fn scope_accepts_titles_and_media_types() {
        let titled: StorefrontConfig = toml::from_str(r#"scope = "Music""#).expect("parse");
        assert_eq!(titled.scope, Scope::Music);
        let media: StorefrontConfig = toml::from_str(r#"scope = "software""#).expect("parse");
        assert_eq!(media.scope, Scope::Apps);
        assert!(toml::from_str::<StorefrontConfig>(r#"scope = "podcasts""#).is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = StorefrontConfig::default();
        config.scope = Scope::Books;
        config.format = OutputFormat::Json;
        config.search.limit = 50;

        config.save_to_file(&path).expect("save");
        let loaded = StorefrontConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = StorefrontConfig::from_file(Path::new("/nonexistent/storefront.toml"));
        assert!(matches!(result, Err(StorefrontError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = StorefrontConfig::from_file(&path);
        assert!(matches!(result, Err(StorefrontError::Config(_))));
    }

    #[test]
    fn from_file_rejects_invalid_search_section() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("limit.toml");
        std::fs::write(&path, "[search]\nlimit = 0\n").expect("write");

        let result = StorefrontConfig::from_file(&path);
        assert!(matches!(result, Err(StorefrontError::Search(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = StorefrontConfig::default_config_path();
        assert!(path.ends_with("storefront/config.toml"));
    }
}
