use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ClientConfig;
use crate::error::{PodError, Result};

const CONFIG_DIR_NAME: &str = ".gse-pod";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Keys accepted by `config get` / `config set`
pub const KEYS: [&str; 3] = ["gse.base_url", "gse.timeout", "gse.user_agent"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub gse: GseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GseConfig {
    /// ArcGIS REST root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Config {
    /// Get the configuration directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| PodError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Load configuration from a file, writing defaults first if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| PodError::Config(format!("Failed to read config file: {}", e)))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents)
            .map_err(|e| PodError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a file with restricted permissions
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    PodError::Config(format!("Failed to create config directory: {}", e))
                })?;

                // Set directory permissions to 0700 on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).map_err(|e| {
                        PodError::Config(format!("Failed to set directory permissions: {}", e))
                    })?;
                }
            }
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| PodError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| PodError::Config(format!("Failed to write config file: {}", e)))?;

        // Set file permissions to 0600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| PodError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "gse.base_url" => {
                let trimmed = value.trim().trim_end_matches('/');
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(PodError::Config(format!(
                        "gse.base_url must be an http(s) URL, got '{}'",
                        value
                    )));
                }
                self.gse.base_url = Some(trimmed.to_string());
            }
            "gse.timeout" => {
                let timeout: u64 = value.trim().parse().map_err(|_| {
                    PodError::Config(format!("gse.timeout must be a number of seconds, got '{}'", value))
                })?;
                if timeout == 0 {
                    return Err(PodError::Config("gse.timeout must be at least 1 second".to_string()));
                }
                self.gse.timeout = Some(timeout);
            }
            "gse.user_agent" => {
                self.gse.user_agent = Some(value.to_string());
            }
            _ => {
                return Err(PodError::Config(format!("Unknown configuration key: {}", key)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "gse.base_url" => self.gse.base_url.clone(),
            "gse.timeout" => self.gse.timeout.map(|t| t.to_string()),
            "gse.user_agent" => self.gse.user_agent.clone(),
            _ => None,
        }
    }

    /// Client configuration: explicit overrides, then this file, then defaults
    pub fn client_config(&self, base_url: Option<&str>, timeout: Option<u64>) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: base_url
                .map(str::to_string)
                .or_else(|| self.gse.base_url.clone())
                .unwrap_or(defaults.base_url),
            timeout: timeout.or(self.gse.timeout).unwrap_or(defaults.timeout),
            user_agent: self.gse.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}
