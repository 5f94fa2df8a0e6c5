//! Configuration for record loading, search limits and output.
//!
//! Load order: `.breedpath/config.toml` → environment variables → defaults.

use crate::records::NameField;
use crate::registry::DuplicatePolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".breedpath";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedConfig {
    pub input: InputConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

/// Where the egg-group records come from and how they are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Record file; relative paths resolve against the project root.
    pub data_file: PathBuf,
    pub name_field: NameField,
    pub duplicates: DuplicatePolicy,
}

/// Search limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Longest chain (in hops) worth reporting. Unlimited when unset.
    pub max_hops: Option<usize>,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub separator: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("egggroups.txt"),
            name_field: NameField::Doubled,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: " -> ".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

/// Path of the config file for a project root.
pub fn config_file(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

impl BreedConfig {
    /// Load config from `.breedpath/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = config_file(project_root);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        // Environment variable overrides
        env_override("BREEDPATH_DATA_FILE", &mut config.input.data_file);
        env_override("BREEDPATH_SEPARATOR", &mut config.output.separator);
        if let Ok(v) = std::env::var("BREEDPATH_MAX_HOPS")
            && let Ok(n) = v.parse()
        {
            config.search.max_hops = Some(n);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce meaningful output.
    pub fn validate(&self) -> Result<()> {
        if self.output.separator.is_empty() {
            anyhow::bail!("output.separator must not be empty");
        }
        if self.input.data_file.as_os_str().is_empty() {
            anyhow::bail!("input.data_file must not be empty");
        }
        Ok(())
    }

    /// Record file path, resolved against `project_root` when relative.
    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        if self.input.data_file.is_absolute() {
            self.input.data_file.clone()
        } else {
            project_root.join(&self.input.data_file)
        }
    }
}
