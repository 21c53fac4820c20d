// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hierarchy::{HierarchyOptions, DEFAULT_MAX_DEPTH};

/// Префикс переменных окружения: NEXTDOMEN_HIERARCHY__MAX_DEPTH=12
pub const ENV_PREFIX: &str = "NEXTDOMEN";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    /// Файл снимка каталога (.json / .yaml)
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    #[serde(default)]
    pub web_server: ServerConfig,

    #[serde(default)]
    pub hierarchy: HierarchyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_snapshot_path() -> String {
    "data/snapshot.json".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            web_server: ServerConfig::default(),
            hierarchy: HierarchyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: default_address() }
    }
}

/// Ограничения дерева: защита интерфейса, а не свойства каталога
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HierarchyConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_leaf_display_cap")]
    pub leaf_display_cap: Option<usize>,
}

fn default_max_depth() -> usize { DEFAULT_MAX_DEPTH }
fn default_leaf_display_cap() -> Option<usize> { Some(50) }

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            leaf_display_cap: default_leaf_display_cap(),
        }
    }
}

impl From<&HierarchyConfig> for HierarchyOptions {
    fn from(config: &HierarchyConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            leaf_display_cap: config.leaf_display_cap,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub enable_json_output: bool,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_json_output: false,
        }
    }
}

impl AppConfig {
    /// Файл (если есть) + переменные окружения NEXTDOMEN_*
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(found) = Self::default_location() {
                    builder = builder.add_source(config::File::from(found).required(false));
                }
            }
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// ./config.yaml, затем <config_dir>/nextdomen/config.yaml
    pub fn default_location() -> Option<PathBuf> {
        let local = PathBuf::from("config.yaml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("nextdomen").join("config.yaml"))
            .filter(|path| path.exists())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn hierarchy_options(&self) -> HierarchyOptions {
        HierarchyOptions::from(&self.hierarchy)
    }
}
