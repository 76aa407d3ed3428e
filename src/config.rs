use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no TMDB API key: set api.api_key in the config file, export TMDB_API_KEY or pass --api-key")]
    MissingApiKey,
}

/// Remote catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            language: "en-US".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_millis: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { toast_millis: 2800 }
    }
}

impl UiConfig {
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_millis)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where saved lists and logs live. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("org", "movie-explorer", "movie-explorer")
        .ok_or(ConfigError::NoHomeDirectory)
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Load from `path`, or from the default location. A missing file is
    /// not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw, &path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key(Some(key));
        }
        Ok(config)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Later sources win; blank keys are ignored.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key.trim().to_string());
        }
    }

    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api.api_key.clone().ok_or(ConfigError::MissingApiKey)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.api.language, "en-US");
        assert_eq!(config.ui.toast_ttl(), Duration::from_millis(2800));
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            "[api]\napi_key = \"abc\"\n\n[ui]\ntoast_millis = 1000\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(config.api_key().unwrap(), "abc");
        assert_eq!(config.api.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.ui.toast_millis, 1000);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let err = Config::parse("[api\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_reads_file_and_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"/tmp/movies\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/movies"));

        let missing = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(missing.storage.data_dir.is_none());
    }

    #[test]
    fn test_apply_api_key_ignores_blank() {
        let mut config = Config::default();
        config.apply_api_key(Some("  first ".to_string()));
        config.apply_api_key(Some("   ".to_string()));
        config.apply_api_key(None);
        assert_eq!(config.api_key().unwrap(), "first");
    }
}
