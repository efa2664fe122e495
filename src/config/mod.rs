use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Url;

use crate::{
    errors::ConfigError,
    utils::{app_data_dir, config_file_in, ensure_dir},
};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_STATUS_TTL_SECS: u64 = 3;

const TMP_SUFFIX: &str = "tmp";

/// Settings the shell reads at startup and edits through `config set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub status_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            status_ttl_secs: DEFAULT_STATUS_TTL_SECS,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 2] = ["api_url", "status_ttl"];

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }

    /// Applies a `config set <key> <value>` edit after validating it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" => {
                self.api_url = validate_api_url(value)?;
                Ok(())
            }
            "status_ttl" => {
                let secs = value.trim().parse::<u64>().map_err(|_| {
                    ConfigError::Invalid(format!("status_ttl must be whole seconds, got `{value}`"))
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid(
                        "status_ttl must be at least one second".into(),
                    ));
                }
                self.status_ttl_secs = secs;
                Ok(())
            }
            other => Err(ConfigError::Invalid(format!(
                "unknown setting `{}` (expected one of: {})",
                other,
                Self::KEYS.join(", ")
            ))),
        }
    }
}

pub fn validate_api_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed)
        .map_err(|err| ConfigError::Invalid(format!("api_url `{trimmed}` is not a URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "api_url must use http or https, got `{}`",
            url.scheme()
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.status_ttl(), Duration::from_secs(3));
    }

    #[test]
    fn save_then_load_keeps_edits() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("api_url", "https://bank.example.com/api/").unwrap();
        config.set("status_ttl", "5").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.api_url, "https://bank.example.com/api");
        assert_eq!(loaded.status_ttl_secs, 5);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"status_ttl_secs": 10}"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
        assert_eq!(loaded.status_ttl_secs, 10);
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = Config::default();
        assert!(config.set("api_url", "not a url").is_err());
        assert!(config.set("api_url", "ftp://bank.example.com").is_err());
        assert!(config.set("status_ttl", "0").is_err());
        assert!(config.set("status_ttl", "soon").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }
}
