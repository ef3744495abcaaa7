//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./isopod.toml or ./.isopod/config.toml
//! 2. User config: ~/.isopod/config.toml
//! 3. System config: /etc/isopod/config.toml
//! 4. Built-in defaults

use crate::config::{ConfigError, IsopodConfig, Result};
use crate::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load an explicit file, or discover one using the hierarchy
    pub fn load(config_override: Option<&Path>) -> Result<IsopodConfig> {
        match config_override {
            Some(path) => {
                info!("Loading configuration override from: {:?}", path);
                IsopodConfig::from_toml_file(path)
            }
            None => Self::discover_config(),
        }
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<IsopodConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return IsopodConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(IsopodConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        Self::first_existing(&Self::config_candidates())
    }

    fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate.clone());
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Configuration file candidates in priority order
    pub fn config_candidates() -> Vec<PathBuf> {
        Self::candidates_for(
            std::env::current_dir().ok().as_deref(),
            env::home_dir().as_deref(),
        )
    }

    fn candidates_for(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(current_dir) = current_dir {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(current_dir));
        }

        if let Some(home_dir) = home_dir {
            candidates.push(env::user_config_file_path(home_dir));
        }

        candidates.push(env::system_config_file_path());
        candidates
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir = env::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Self::create_default_config_in(&home_dir)
    }

    fn create_default_config_in(home_dir: &Path) -> Result<PathBuf> {
        let config_dir = env::user_config_dir_path(home_dir);
        let config_path = env::user_config_file_path(home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|source| ConfigError::Write {
                path: config_dir.clone(),
                source,
            })?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            IsopodConfig::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::config_candidates().iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        match Self::find_config_file() {
            Some(found) => println!("Active configuration: {:?}", found),
            None => println!("Active configuration: Built-in defaults"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_candidates_order() {
        let candidates = ConfigDiscovery::candidates_for(
            Some(Path::new("/work/project")),
            Some(Path::new("/home/dev")),
        );

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/work/project/isopod.toml"),
                PathBuf::from("/work/project/.isopod/config.toml"),
                PathBuf::from("/home/dev/.isopod/config.toml"),
                PathBuf::from("/etc/isopod/config.toml"),
            ]
        );
    }

    #[test]
    fn test_candidates_without_home() {
        let candidates = ConfigDiscovery::candidates_for(None, None);
        assert_eq!(candidates, vec![PathBuf::from("/etc/isopod/config.toml")]);
    }

    #[test]
    fn test_first_existing_prefers_earlier_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        let home = temp_dir.path().join("home");
        fs::create_dir_all(project.join(".isopod")).unwrap();
        fs::create_dir_all(home.join(".isopod")).unwrap();

        fs::write(home.join(".isopod/config.toml"), "").unwrap();
        let candidates = ConfigDiscovery::candidates_for(Some(&project), Some(&home));
        assert_eq!(
            ConfigDiscovery::first_existing(&candidates),
            Some(home.join(".isopod/config.toml"))
        );

        fs::write(project.join(".isopod/config.toml"), "").unwrap();
        assert_eq!(
            ConfigDiscovery::first_existing(&candidates),
            Some(project.join(".isopod/config.toml"))
        );
    }

    #[test]
    fn test_create_default_config_in_home() {
        let temp_dir = TempDir::new().unwrap();

        let path = ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join(".isopod/config.toml"));

        let loaded = IsopodConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded, IsopodConfig::default());

        // Second call leaves the existing file alone
        fs::write(&path, "[engine]\nprogram = \"custom\"\n").unwrap();
        ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        let kept = IsopodConfig::from_toml_file(&path).unwrap();
        assert_eq!(kept.engine.program, "custom");
    }

    #[test]
    fn test_load_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[root]\npath = \"/srv/pods/beta\"\n").unwrap();

        let config = ConfigDiscovery::load(Some(&path)).unwrap();
        assert_eq!(config.root.path, Some(PathBuf::from("/srv/pods/beta")));
    }
}
