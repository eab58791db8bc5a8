use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub(crate) const CONFIG_ENV_VAR: &str = "DIALOG_DEMO_CONFIG";
pub(crate) const SCRIPT_ENV_VAR: &str = "DIALOG_DEMO_SCRIPT";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}'{at}: {source}")]
    Parse {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("default_volume must be within 0.0..=1.0, got {0}")]
    VolumeOutOfRange(f32),
    #[error("unknown start_scene '{0}' (expected title|game)")]
    UnknownStartScene(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CreditsConfig {
    pub(crate) title: String,
    pub(crate) lines: Vec<String>,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            title: "Credits".to_string(),
            lines: vec![
                "Game Developer: Hemuichi".to_string(),
                "Level Design: Ogu".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfirmConfig {
    pub(crate) title: String,
    pub(crate) message: String,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            title: "Reset Settings".to_string(),
            message: "Are you sure you want to reset all settings to default?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) start_scene: String,
    pub(crate) default_volume: f32,
    pub(crate) credits: CreditsConfig,
    pub(crate) reset_confirm: ConfirmConfig,
    pub(crate) echo_prompt: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_scene: "title".to_string(),
            default_volume: 1.0,
            credits: CreditsConfig::default(),
            reset_confirm: ConfirmConfig::default(),
            echo_prompt: false,
        }
    }
}

impl AppConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(path, &raw)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, AppConfig>(&mut deserializer).map_err(|error| {
            let at = error.path().to_string();
            let at = if at.is_empty() || at == "." {
                String::new()
            } else {
                format!(" at {at}")
            };
            ConfigError::Parse {
                path: path.to_path_buf(),
                at,
                source: error.into_inner(),
            }
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(ConfigError::VolumeOutOfRange(self.default_volume));
        }
        if !matches!(self.start_scene.as_str(), "title" | "game") {
            return Err(ConfigError::UnknownStartScene(self.start_scene.clone()));
        }
        Ok(())
    }
}

pub(crate) fn script_path_from_env() -> Option<PathBuf> {
    std::env::var_os(SCRIPT_ENV_VAR)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}
