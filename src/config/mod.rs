use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
/// Overrides the base directory used for configuration files.
pub const HOME_ENV: &str = "HERU_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Settings for the generative-text collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrativeConfig {
    #[serde(default = "NarrativeConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "NarrativeConfig::default_model")]
    pub model: String,
    /// Name of the environment variable holding the credential. The key
    /// itself is never written to disk.
    #[serde(default = "NarrativeConfig::default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "NarrativeConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            model: Self::default_model(),
            api_key_env: Self::default_api_key_env(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

impl NarrativeConfig {
    pub fn default_endpoint() -> String {
        "https://generativelanguage.googleapis.com/v1beta".into()
    }

    pub fn default_model() -> String {
        "gemini-2.5-flash".into()
    }

    pub fn default_api_key_env() -> String {
        "API_KEY".into()
    }

    pub fn default_timeout_ms() -> u64 {
        10_000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Credential from the environment; blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Simulated latencies for operations that stand in for remote calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatencyConfig {
    #[serde(default = "LatencyConfig::default_auth_ms")]
    pub auth_ms: u64,
    #[serde(default = "LatencyConfig::default_sign_ms")]
    pub sign_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            auth_ms: Self::default_auth_ms(),
            sign_ms: Self::default_sign_ms(),
        }
    }
}

impl LatencyConfig {
    pub fn default_auth_ms() -> u64 {
        1_500
    }

    pub fn default_sign_ms() -> u64 {
        2_000
    }

    /// No simulated waiting; used by tests and script runs.
    pub fn instant() -> Self {
        Self {
            auth_ms: 0,
            sign_ms: 0,
        }
    }

    pub fn auth(&self) -> Duration {
        Duration::from_millis(self.auth_ms)
    }

    pub fn sign(&self) -> Duration {
        Duration::from_millis(self.sign_ms)
    }
}

/// Loads and saves [`Config`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `HERU_HOME` when set, otherwise the platform config directory.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(default_base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_root = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
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
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_base_dir() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("heru")
}

fn tmp_path(target: &Path) -> PathBuf {
    let mut tmp = target.to_path_buf();
    tmp.set_extension(TMP_SUFFIX);
    tmp
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.latency.auth_ms, 1_500);
        assert_eq!(config.narrative.model, "gemini-2.5-flash");
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.narrative.timeout_ms = 250;
        config.latency = LatencyConfig::instant();
        manager.save(&config).unwrap();
        assert!(!tmp_path(manager.path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "latency": { "sign_ms": 5 } }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.latency.sign_ms, 5);
        assert_eq!(config.latency.auth_ms, 1_500);
        assert_eq!(config.narrative.api_key_env, "API_KEY");
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let config = NarrativeConfig {
            api_key_env: "HERU_TEST_BLANK_KEY".into(),
            ..NarrativeConfig::default()
        };
        env::set_var("HERU_TEST_BLANK_KEY", "   ");
        assert_eq!(config.resolve_api_key(), None);
        env::remove_var("HERU_TEST_BLANK_KEY");
    }
}
