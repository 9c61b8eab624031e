use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::render::background::BackgroundKind;
use crate::render::transition::TransitionKind;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "agentdeck";

const KEYS: &str =
    "defaults.transition, defaults.start_slide, defaults.reduced_motion, defaults.background";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    /// 1-indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `agentdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// The saved config, or defaults when there is none or it cannot be read.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!("Using default config: {err:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# agentdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.transition" => {
                if TransitionKind::from_name(value).is_none() {
                    anyhow::bail!(
                        "Invalid transition: {value}. Must be 'fade', 'slide', or 'none'."
                    );
                }
                defaults.transition = Some(value.to_string());
            }
            "defaults.start_slide" => match value.parse::<usize>() {
                Ok(n) if n >= 1 => defaults.start_slide = Some(n),
                _ => anyhow::bail!(
                    "Invalid start_slide: {value}. Must be a slide number starting at 1."
                ),
            },
            "defaults.reduced_motion" => match value {
                "true" | "on" | "yes" => defaults.reduced_motion = Some(true),
                "false" | "off" | "no" => defaults.reduced_motion = Some(false),
                _ => anyhow::bail!("Invalid reduced_motion: {value}. Must be 'true' or 'false'."),
            },
            "defaults.background" => {
                if BackgroundKind::from_name(value).is_none() {
                    anyhow::bail!("Invalid background: {value}. Must be 'shader' or 'static'.");
                }
                defaults.background = Some(value.to_string());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {KEYS}"),
        }
        Ok(())
    }

    pub fn transition(&self) -> TransitionKind {
        self.defaults
            .as_ref()
            .and_then(|d| d.transition.as_deref())
            .and_then(TransitionKind::from_name)
            .unwrap_or_default()
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    pub fn reduced_motion(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.reduced_motion)
            .unwrap_or(false)
    }

    pub fn background(&self) -> BackgroundKind {
        self.defaults
            .as_ref()
            .and_then(|d| d.background.as_deref())
            .and_then(BackgroundKind::from_name)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("agentdeck-config-{}-{name}", std::process::id()))
            .join(FILENAME)
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.transition(), TransitionKind::Fade);
        assert_eq!(config.start_slide(), None);
        assert!(!config.reduced_motion());
        assert_eq!(config.background(), BackgroundKind::Shader);
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.transition", "slide").unwrap();
        config.set("defaults.start_slide", "3").unwrap();
        config.set("defaults.reduced_motion", "true").unwrap();
        config.set("defaults.background", "static").unwrap();

        assert_eq!(config.transition(), TransitionKind::SlideHorizontal);
        assert_eq!(config.start_slide(), Some(3));
        assert!(config.reduced_motion());
        assert_eq!(config.background(), BackgroundKind::Static);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.transition", "spatial").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("defaults.start_slide", "first").is_err());
        assert!(config.set("defaults.reduced_motion", "maybe").is_err());
        assert!(config.set("defaults.background", "video").is_err());

        let err = config.set("defaults.theme", "dark").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
        assert_eq!(config.transition(), TransitionKind::Fade, "unchanged");
    }

    #[test]
    fn test_unknown_names_in_file_fall_back() {
        let config: Config =
            serde_yaml::from_str("defaults:\n  transition: spin\n  background: video\n").unwrap();
        assert_eq!(config.transition(), TransitionKind::Fade);
        assert_eq!(config.background(), BackgroundKind::Shader);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut config = Config::default();
        config.set("defaults.transition", "none").unwrap();
        config.set("defaults.start_slide", "7").unwrap();
        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# agentdeck configuration"));
        assert!(!text.contains("background"), "unset keys are omitted");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_missing_file_hints_at_config_show() {
        let err = Config::load_from(Path::new("/definitely/not/here/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("agentdeck config show"));
    }
}
