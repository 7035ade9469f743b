// Player configuration
// Read from <config_dir>/tapeflow/config.json; every field is optional and
// falls back to the built-in defaults. Environment variables win over the file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::youtube::api::ApiFamily;

pub const APP_DIR: &str = "tapeflow";
const CONFIG_FILE: &str = "config.json";

const ENV_API: &str = "TAPEFLOW_API";
const ENV_DOWNLOAD_DIR: &str = "TAPEFLOW_DOWNLOAD_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_api: ApiFamily,
    // Families missing here keep their built-in mirror lists
    pub endpoints: HashMap<ApiFamily, Vec<String>>,
    pub request_timeout_secs: u64,
    pub download_dir: Option<PathBuf>,
    pub initial_volume: u32,
    pub seek_step_secs: u64,
    pub notification_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_api: ApiFamily::Piped,
            endpoints: HashMap::new(),
            request_timeout_secs: 15,
            download_dir: None,
            initial_volume: 80,
            seek_step_secs: 10,
            notification_secs: 4,
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

impl Config {
    // Missing file means defaults; a broken file is an error worth reporting
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match config_dir() {
            Some(dir) => Self::load_from(&dir.join(CONFIG_FILE))?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(api) = var(ENV_API) {
            match api.parse() {
                Ok(family) => self.default_api = family,
                Err(e) => tracing::warn!(error = %e, "ignoring {}", ENV_API),
            }
        }
        if let Some(dir) = var(ENV_DOWNLOAD_DIR).filter(|d| !d.is_empty()) {
            self.download_dir = Some(PathBuf::from(dir));
        }
    }

    // Full mirror table: configured lists override the built-in ones
    pub fn mirrors(&self) -> HashMap<ApiFamily, Vec<String>> {
        ApiFamily::ALL
            .into_iter()
            .map(|family| {
                let list = self
                    .endpoints
                    .get(&family)
                    .filter(|list| !list.is_empty())
                    .cloned()
                    .unwrap_or_else(|| family.default_mirrors());
                (family, list)
            })
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::audio_dir)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config.default_api, ApiFamily::Piped);
        assert_eq!(config.initial_volume, 80);
        assert_eq!(config.seek_step(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"default_api": "invidious2", "endpoints": {"piped": ["https://piped.local"]}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let mirrors = config.mirrors();

        assert_eq!(config.default_api, ApiFamily::Invidious2);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(mirrors[&ApiFamily::Piped], vec!["https://piped.local"]);
        assert_eq!(mirrors[&ApiFamily::Invidious], ApiFamily::Invidious.default_mirrors());
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_API => Some("invidious".to_string()),
            ENV_DOWNLOAD_DIR => Some("/tmp/tapes".to_string()),
            _ => None,
        });

        assert_eq!(config.default_api, ApiFamily::Invidious);
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/tapes"));
    }

    #[test]
    fn bad_env_api_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == ENV_API).then(|| "soundcloud".to_string()));
        assert_eq!(config.default_api, ApiFamily::Piped);
    }
}
