use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::types::ReconConfig;
use crate::core::errors::ReconError;

const CONFIG_FILE: &str = "recon-ninja.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an explicit file, the default locations, or
    /// fall back to built-in settings.
    pub fn load(custom_path: Option<&Path>) -> Result<ReconConfig> {
        if let Some(path) = custom_path {
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path));
        }

        for path in Self::default_paths() {
            if path.exists() {
                let config = Self::load_from_file(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?;
                tracing::info!("Loaded configuration from: {:?}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using default settings");
        Ok(ReconConfig::default())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dirs) = ProjectDirs::from("", "", "recon-ninja") {
            paths.push(dirs.config_dir().join(CONFIG_FILE));
        }
        paths
    }

    fn load_from_file(path: &Path) -> Result<ReconConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: ReconConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {:?}", path))?;

        Self::validate_config(&config)?;
        Ok(config)
    }

    fn validate_config(config: &ReconConfig) -> Result<(), ReconError> {
        if config.output_root.as_os_str().is_empty() {
            return Err(ReconError::Config("output_root cannot be empty".into()));
        }

        if config.required_tools.is_empty() {
            return Err(ReconError::Config("required_tools cannot be empty".into()));
        }
        if config.required_tools.iter().any(|t| t.trim().is_empty()) {
            return Err(ReconError::Config(
                "required_tools cannot contain blank names".into(),
            ));
        }

        if config.redirect_params.is_empty() {
            return Err(ReconError::Config("redirect_params cannot be empty".into()));
        }
        if config.redirect_params.iter().any(|p| p.is_empty()) {
            return Err(ReconError::Config(
                "redirect_params cannot contain empty entries".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ReconConfig::default();
        assert_eq!(config.output_root, PathBuf::from("output"));
        assert_eq!(config.required_tools.len(), 7);
        assert_eq!(config.redirect_params.len(), 63);
        assert!(config.search_path.is_none());
    }

    #[test]
    fn test_load_partial_config_keeps_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(
            &temp_file,
            r#"
output_root = "/tmp/recon"
required_tools = ["subfinder", "httpx"]
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(temp_file.path())).unwrap();
        assert_eq!(config.output_root, PathBuf::from("/tmp/recon"));
        assert_eq!(config.required_tools, vec!["subfinder", "httpx"]);
        assert_eq!(config.redirect_params.len(), 63);
    }

    #[test]
    fn test_validation_errors() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "required_tools = []\n").unwrap();

        let result = ConfigLoader::load(Some(temp_file.path()));
        assert!(result.is_err());
        assert!(
            format!("{:#}", result.unwrap_err()).contains("required_tools cannot be empty")
        );
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
