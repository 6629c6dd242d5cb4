use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use visualizer_core::{
    Difficulty, GenerationOptions, Quality, ServiceEndpoints, DEFAULT_BASE_URL,
    DEFAULT_DURATION_SECS,
};
use visualizer_engine::ClientSettings;

/// Persisted front-end settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub difficulty: String,
    pub quality: String,
    pub duration_secs: u32,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            difficulty: options.difficulty().to_string(),
            quality: options.quality().to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            request_timeout_secs: 30,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> anyhow::Result<ServiceEndpoints> {
        Ok(ServiceEndpoints::parse(&self.base_url)?)
    }

    pub fn client_settings(&self) -> anyhow::Result<ClientSettings> {
        Ok(ClientSettings {
            endpoints: self.endpoints()?,
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..ClientSettings::default()
        })
    }

    pub fn generation_options(&self) -> anyhow::Result<GenerationOptions> {
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .context("invalid difficulty in settings")?;
        let quality = self.quality.parse::<Quality>().context("invalid quality in settings")?;
        Ok(GenerationOptions::new(
            difficulty,
            quality,
            self.duration_secs,
        )?)
    }
}

/// Missing file means defaults; an unreadable or malformed file is reported
/// and also falls back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            engine_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            engine_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            engine_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}
