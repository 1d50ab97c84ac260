//! Configuration management for edgeguard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::models::{GLOBAL_REGION, ResourceType};
use crate::client::parallel::DEFAULT_MAX_CONCURRENT;
use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Regions to scan when none are given on the command line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    /// Resource types to scan when none are given on the command line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<ResourceType>,

    /// Inventory snapshot to scan instead of a live account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,

    /// Role to assume for live scans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    /// External ID passed when assuming `role_arn`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Maximum concurrent collaborator calls
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Directory for generated CSV reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            max_concurrent: default_max_concurrent(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".edgeguard").join("config.yaml"))
    }

    /// Config path from `--config`/`EDGEGUARD_CONFIG`, else the default.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, treating a missing file as defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Reject values no scan could run with
    pub fn validate(&self) -> Result<()> {
        if self.preferences.max_concurrent == 0 {
            return Err(
                ConfigError::Invalid("preferences.max_concurrent must be at least 1".into()).into(),
            );
        }
        if self.regions.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid("regions must not contain empty names".into()).into());
        }
        Ok(())
    }

    /// Configured regions, or the global region alone
    pub fn effective_regions(&self) -> Vec<String> {
        if self.regions.is_empty() {
            vec![GLOBAL_REGION.to_string()]
        } else {
            self.regions.clone()
        }
    }

    /// Configured resource types, or all of them
    pub fn effective_resource_types(&self) -> Vec<ResourceType> {
        if self.resource_types.is_empty() {
            ResourceType::ALL.to_vec()
        } else {
            self.resource_types.clone()
        }
    }
}
