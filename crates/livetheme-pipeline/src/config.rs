//! Theme configuration.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration surface consumed by the pipeline core.
///
/// `theme_dir` is the directory holding the theme variant files; the two
/// file names are joined onto it. `theme_class_pre` is the textual prefix
/// of the synthesized custom-property names (and of the runtime CSS class
/// the bundle shim toggles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory containing the theme variant files
    pub theme_dir: PathBuf,

    /// Dark variant file name, relative to `theme_dir`
    #[serde(default = "default_dark_file_name")]
    pub dark_file_name: String,

    /// Light variant file name, relative to `theme_dir`
    #[serde(default = "default_light_file_name")]
    pub light_file_name: String,

    /// Prefix for synthesized custom-property names, e.g. `antd-theme`
    /// produces `var(--antd-theme-primary-color)`
    #[serde(default = "default_theme_class_pre")]
    pub theme_class_pre: String,
}

fn default_dark_file_name() -> String {
    "dark.less".to_string()
}

fn default_light_file_name() -> String {
    "light.less".to_string()
}

fn default_theme_class_pre() -> String {
    "antd-theme".to_string()
}

impl ThemeConfig {
    /// Create a configuration with default file names and prefix.
    pub fn new(theme_dir: impl Into<PathBuf>) -> Self {
        ThemeConfig {
            theme_dir: theme_dir.into(),
            dark_file_name: default_dark_file_name(),
            light_file_name: default_light_file_name(),
            theme_class_pre: default_theme_class_pre(),
        }
    }

    /// Absolute path of the dark variant file.
    pub fn dark_path(&self) -> PathBuf {
        self.theme_dir.join(&self.dark_file_name)
    }

    /// Absolute path of the light variant file.
    pub fn light_path(&self) -> PathBuf {
        self.theme_dir.join(&self.light_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_defaults() {
        let config = ThemeConfig::new("/app/src/theme");
        assert_eq!(config.dark_file_name, "dark.less");
        assert_eq!(config.light_file_name, "light.less");
        assert_eq!(config.theme_class_pre, "antd-theme");
    }

    #[test]
    fn test_config_variant_paths() {
        let config = ThemeConfig::new("/app/src/theme");
        assert_eq!(config.dark_path(), PathBuf::from("/app/src/theme/dark.less"));
        assert_eq!(
            config.light_path(),
            PathBuf::from("/app/src/theme/light.less")
        );
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: ThemeConfig =
            serde_json::from_str(r#"{ "theme_dir": "/app/theme" }"#).unwrap();
        assert_eq!(config.theme_dir, PathBuf::from("/app/theme"));
        assert_eq!(config.dark_file_name, "dark.less");
        assert_eq!(config.theme_class_pre, "antd-theme");
    }

    #[test]
    fn test_config_deserialize_overrides() {
        let config: ThemeConfig = serde_json::from_str(
            r#"{
                "theme_dir": "/app/theme",
                "dark_file_name": "night.less",
                "theme_class_pre": "my-app"
            }"#,
        )
        .unwrap();
        assert_eq!(config.dark_file_name, "night.less");
        assert_eq!(config.light_file_name, "light.less");
        assert_eq!(config.theme_class_pre, "my-app");
    }
}
