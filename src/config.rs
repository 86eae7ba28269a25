use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Result, StoryflowError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// preview runtime limits
    pub runtime: RuntimeConfig,
    /// store config
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// maximum nesting of template interpolation, defaults to 16
    pub max_template_depth: usize,
    /// maximum number of automatic hops (condition nodes, container boundaries) per step, defaults to 64
    pub max_auto_steps: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// store type
    pub store_type: StoreType,
    /// file store config
    pub file: Option<FileStoreConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    #[default]
    Mem,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileStoreConfig {
    /// directory holding the saved document and exports
    pub dir: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_template_depth: 16,
            max_auto_steps: 64,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| StoryflowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        if config.runtime.max_auto_steps == 0 {
            return Err(StoryflowError::Config("runtime.max_auto_steps must be at least 1".to_string()));
        }
        if config.store.store_type == StoreType::File && config.store.file.is_none() {
            return Err(StoryflowError::Config("[store.file] is required when store type is file".to_string()));
        }
        Ok(config)
    }
}
