//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub contacts: ContactsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where to find the decrypted database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Explicit snapshot path; when unset the data directory is searched
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    #[serde(default = "default_contacts_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,

    #[serde(default = "default_enabled")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_data_dir() -> String {
    "data".to_string()
}

fn default_contacts_path() -> String {
    "data/contacts_mapping.json".to_string()
}

fn default_output_path() -> String {
    "output/archive.json".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: None,
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            path: default_contacts_path(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./chatvault.yaml (current directory)
    /// 3. ~/.config/chatvault/chatvault.yaml
    pub fn load(path: &str) -> Result<Self> {
        let mut search_paths = vec![expand(path), PathBuf::from("chatvault.yaml")];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("chatvault").join("chatvault.yaml"));
        }

        for search_path in &search_paths {
            if search_path.exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Explicitly configured snapshot path, `~` expanded
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot.path.as_deref().map(expand)
    }

    pub fn data_dir(&self) -> PathBuf {
        expand(&self.snapshot.data_dir)
    }

    pub fn contacts_path(&self) -> PathBuf {
        expand(&self.contacts.path)
    }

    pub fn output_path(&self) -> PathBuf {
        expand(&self.output.path)
    }
}
