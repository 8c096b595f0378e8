//! Paginator settings loaded from YAML or JSON
//!
//! A settings file mirrors [`PaginatorConfig`] and adds an optional
//! periodic cache timeout:
//!
//! ```yaml
//! pages_controls: true
//! range: true
//! start_with: 1
//! controls_window: 7      # null renders every page
//! cache_timeout_ms: 30000
//! ```

use crate::error::{Error, Result};
use crate::paginator::{PaginatorBuilder, PaginatorConfig, DEFAULT_CONTROLS_WINDOW};
use crate::types::{PageKey, FIRST_PAGE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Serializable paginator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginatorSettings {
    /// Compute page controls for every view
    #[serde(default)]
    pub pages_controls: bool,

    /// Compute the displayed item range for every view
    #[serde(default)]
    pub range: bool,

    /// Initial page
    #[serde(default = "default_start_with")]
    pub start_with: PageKey,

    /// Page-control window size (`null` renders every page)
    #[serde(default = "default_controls_window")]
    pub controls_window: Option<u32>,

    /// Clear the whole cache this often
    #[serde(default)]
    pub cache_timeout_ms: Option<u64>,
}

fn default_start_with() -> PageKey {
    FIRST_PAGE
}

fn default_controls_window() -> Option<u32> {
    Some(DEFAULT_CONTROLS_WINDOW)
}

impl Default for PaginatorSettings {
    fn default() -> Self {
        Self {
            pages_controls: false,
            range: false,
            start_with: default_start_with(),
            controls_window: default_controls_window(),
            cache_timeout_ms: None,
        }
    }
}

impl PaginatorSettings {
    /// Parse and validate settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, picking the format from its extension
    ///
    /// `.json` files are read as JSON, everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Reject values the paginator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.start_with == 0 {
            return Err(Error::invalid_value("start_with", "pages start at 1"));
        }
        if self.controls_window == Some(0) {
            return Err(Error::invalid_value(
                "controls_window",
                "must be at least 1, or null for every page",
            ));
        }
        if self.cache_timeout_ms == Some(0) {
            return Err(Error::invalid_value(
                "cache_timeout_ms",
                "must be at least 1 millisecond",
            ));
        }
        Ok(())
    }

    /// Construction-time options described by these settings
    pub fn to_config(&self) -> PaginatorConfig {
        let mut config = PaginatorConfig::new()
            .start_with(self.start_with)
            .with_controls_window(self.controls_window);
        if self.pages_controls {
            config = config.with_controls();
        }
        if self.range {
            config = config.with_range();
        }
        config
    }

    /// Cache timeout period, if any
    pub fn cache_timeout(&self) -> Option<Duration> {
        self.cache_timeout_ms.map(Duration::from_millis)
    }

    /// Paginator builder preconfigured from these settings
    pub fn builder<T>(&self) -> Result<PaginatorBuilder<T>> {
        self.validate()?;

        let builder = PaginatorBuilder::new().config(self.to_config());
        Ok(match self.cache_timeout() {
            Some(period) => builder.cache_timeout_every(period),
            None => builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let settings = PaginatorSettings::from_yaml_str("{}").unwrap();
        assert_eq!(settings, PaginatorSettings::default());
        assert_eq!(settings.to_config(), PaginatorConfig::default());
        assert!(settings.cache_timeout().is_none());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r"
pages_controls: true
range: true
start_with: 3
controls_window: 7
cache_timeout_ms: 1500
";
        let settings = PaginatorSettings::from_yaml_str(yaml).unwrap();
        let config = settings.to_config();

        assert!(config.pages_controls);
        assert!(config.range);
        assert_eq!(config.start_with, 3);
        assert_eq!(config.controls_window, Some(7));
        assert_eq!(settings.cache_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_null_window_renders_every_page() {
        let settings = PaginatorSettings::from_json_str(r#"{"controls_window": null}"#).unwrap();
        assert_eq!(settings.controls_window, None);
    }

    #[test]
    fn test_zero_values_rejected() {
        for yaml in ["start_with: 0", "controls_window: 0", "cache_timeout_ms: 0"] {
            let err = PaginatorSettings::from_yaml_str(yaml).unwrap_err();
            assert!(
                matches!(err, Error::InvalidConfigValue { .. }),
                "{yaml} gave {err}"
            );
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PaginatorSettings::from_yaml_str("page_size: 10").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("pager.yaml");
        std::fs::write(&yaml_path, "range: true\n").unwrap();
        assert!(PaginatorSettings::from_file(&yaml_path).unwrap().range);

        let json_path = dir.path().join("pager.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        writeln!(file, r#"{{"pages_controls": true}}"#).unwrap();
        assert!(PaginatorSettings::from_file(&json_path).unwrap().pages_controls);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = PaginatorSettings::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_builder_applies_settings() {
        let settings = PaginatorSettings {
            start_with: 2,
            cache_timeout_ms: Some(60_000),
            ..PaginatorSettings::default()
        };

        let paginator = settings.builder::<u32>().unwrap().build();
        assert_eq!(paginator.current_page(), 2);
        paginator.destroy();
    }
}
