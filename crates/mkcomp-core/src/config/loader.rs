//! Configuration file discovery and loading

use super::project::ProjectConfig;
use crate::error::MkcompError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// File names searched in each directory, highest priority first
pub const CONFIG_FILE_NAMES: [&str; 5] = [
    ".mkcomprc.json",
    ".mkcomprc.toml",
    ".mkcomprc.yaml",
    "mkcomp.yaml",
    "mkcomp.yml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches every directory for the names in [`CONFIG_FILE_NAMES`], moving
    /// up until a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| MkcompError::ConfigError {
                message: format!("Invalid path: {e}"),
            })?;

        loop {
            for filename in &CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<ProjectConfig> {
        ProjectConfig::load(path).map_err(|e| MkcompError::ConfigError {
            message: format!("Failed to load config from '{}': {}", path.display(), e),
        })
    }

    /// Load config from an explicit path or auto-discover one
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory) and a missing file yields the
    /// default configuration.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<ProjectConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(MkcompError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(ProjectConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{StyleType, TypeSetting};
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".mkcomprc.json",
            r#"{
                "defaults": { "type": "jsx", "style": "scss" },
                "expand": { "compactBoolean": true }
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.component_type, Some(TypeSetting::Jsx));
        assert_eq!(defaults.style, Some(StyleType::Scss));
        assert_eq!(config.expand.unwrap().compact_boolean, Some(true));
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".mkcomprc.toml",
            r#"
[defaults]
directory = "src/components"

[expand]
indent = "    "
"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.defaults().directory.as_deref(), Some("src/components"));
        assert_eq!(config.expand.unwrap().indent.as_deref(), Some("    "));
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "mkcomp.yaml", "defaults:\n  style: none\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "mkcomp.yaml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();

        create_temp_config(temp_dir.path(), "mkcomp.yml", "{}");
        create_temp_config(temp_dir.path(), ".mkcomprc.toml", "");
        create_temp_config(temp_dir.path(), ".mkcomprc.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".mkcomprc.json");
    }

    #[test]
    fn test_load_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        // A config further up the real tree would be picked up, so only check
        // that loading succeeds
        assert!(ConfigLoader::load(None, Some(temp_dir.path())).is_ok());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = ConfigLoader::load(Some(Path::new("missing/.mkcomprc.json")), None).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), ".mkcomprc.json", r#"{ invalid json }"#);

        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Failed to load config from"));
    }
}
