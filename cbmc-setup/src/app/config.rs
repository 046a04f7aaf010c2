//! Configuration Management

use crate::catalog::{TemplateCatalog, PROOF_DIR, PROOF_TEMPLATES, REPOSITORY_TEMPLATES};
use crate::install::{InstallPolicy, COPY_INSTEAD};
use crate::paths::absolutize;
use crate::prepare::{CBMC_BATCH_YAML, MAKEFILE};
use crate::setup::DEFINES_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Template catalog location
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Project layout
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Install policy
    #[serde(default)]
    pub install: InstallConfig,
    /// Batch-config regeneration
    #[serde(default)]
    pub prepare: PrepareConfig,
}

/// Template catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Catalog root; located next to the executable when unset
    pub root: Option<PathBuf>,
    /// Repository template directory name
    pub repository_dir: String,
    /// Proof template directory name
    pub proof_dir: String,
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Proof root directory name under the CBMC root
    pub proof_root_name: String,
    /// Generated defines fragment name
    pub defines_file: String,
}

/// Install configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// File names copied instead of symlinked
    pub copy_instead: Vec<String>,
}

/// Prepare configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Build tool command; the batch file name is appended
    pub command: Vec<String>,
    /// Build recipe file name
    pub makefile: String,
    /// Batch config file name
    pub batch_file: String,
    /// Keep going after a directory fails
    pub continue_on_error: bool,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: None,
            repository_dir: REPOSITORY_TEMPLATES.to_string(),
            proof_dir: PROOF_TEMPLATES.to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            proof_root_name: PROOF_DIR.to_string(),
            defines_file: DEFINES_FILE.to_string(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            copy_instead: COPY_INSTEAD.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            command: vec!["make".to_string(), "-B".to_string()],
            makefile: MAKEFILE.to_string(),
            batch_file: CBMC_BATCH_YAML.to_string(),
            continue_on_error: true,
        }
    }
}

impl Config {
    /// Validate config values.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let names = [
            ("templates.repository_dir", &self.templates.repository_dir),
            ("templates.proof_dir", &self.templates.proof_dir),
            ("layout.proof_root_name", &self.layout.proof_root_name),
            ("layout.defines_file", &self.layout.defines_file),
            ("prepare.makefile", &self.prepare.makefile),
            ("prepare.batch_file", &self.prepare.batch_file),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(crate::Error::Config(format!("{} must not be empty", key)));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(crate::Error::Config(format!(
                    "{} must be a plain name, got {}",
                    key, value
                )));
            }
        }
        if self.prepare.command.first().map(|c| c.trim().is_empty()).unwrap_or(true) {
            return Err(crate::Error::Config("prepare.command must not be empty".to_string()));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path).map_err(crate::Error::fs("read", path))?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(crate::Error::fs("create", parent))?;
        }

        std::fs::write(path, content).map_err(crate::Error::fs("write", path))?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".cbmc_setup").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("cbmc_setup.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Template catalog: explicit override, then config, then next to the executable.
    /// A relative root is resolved against the current directory.
    pub fn catalog(&self, override_root: Option<&Path>) -> Result<TemplateCatalog, crate::Error> {
        let catalog = match override_root.or(self.templates.root.as_deref()) {
            Some(root) => TemplateCatalog::new(
                absolutize(root).map_err(crate::Error::fs("resolve template catalog", root))?,
            ),
            None => TemplateCatalog::locate()?,
        };
        Ok(catalog.with_dir_names(&self.templates.repository_dir, &self.templates.proof_dir))
    }

    /// Install policy built from `install.copy_instead`
    pub fn install_policy(&self) -> InstallPolicy {
        InstallPolicy::new(self.install.copy_instead.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.templates.root.is_none());
        assert_eq!(config.templates.repository_dir, "template-for-repository");
        assert_eq!(config.layout.proof_root_name, "proofs");
        assert_eq!(config.layout.defines_file, "Makefile-template-defines");
        assert_eq!(config.install.copy_instead.len(), 4);
        assert_eq!(config.prepare.command, vec!["make", "-B"]);
        assert!(config.prepare.continue_on_error);
    }

    #[test]
    fn test_config_serialization() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[templates]"));
        assert!(toml.contains("[layout]"));
        assert!(toml.contains("[install]"));
        assert!(toml.contains("[prepare]"));
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = Config::default();
        original.templates.root = Some(PathBuf::from("/opt/cbmc-templates"));
        original.install.copy_instead.push("README.md".to_string());
        original.prepare.continue_on_error = false;

        original.save(&config_path).expect("Failed to save config");
        let loaded = Config::load(&config_path).expect("Failed to load config");

        assert_eq!(loaded.templates.root, Some(PathBuf::from("/opt/cbmc-templates")));
        assert_eq!(loaded.install.copy_instead.len(), 5);
        assert!(!loaded.prepare.continue_on_error);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[prepare]
command = ["gmake", "-B"]
"#,
        )
        .expect("Partial config should deserialize");

        assert_eq!(config.prepare.command, vec!["gmake", "-B"]);
        assert_eq!(config.prepare.batch_file, "cbmc-batch.yaml");
        assert_eq!(config.layout.proof_root_name, "proofs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let err = Config::load(&missing).unwrap_err();
        assert!(err.to_string().contains(&missing.display().to_string()));
    }

    #[test]
    fn test_invalid_toml_parsing() {
        let result: Result<Config, _> = toml::from_str("this is not valid toml {{{}}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_names() {
        let mut config = Config::default();
        config.layout.proof_root_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_paths_as_names() {
        let mut config = Config::default();
        config.prepare.batch_file = "sub/cbmc-batch.yaml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_command() {
        let mut config = Config::default();
        config.prepare.command.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad_config.toml");
        std::fs::write(&config_path, "[prepare]\ncommand = []\n").unwrap();
        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_catalog_override_wins() {
        let mut config = Config::default();
        config.templates.root = Some(PathBuf::from("/from/config"));

        let catalog = config.catalog(Some(Path::new("/from/flag"))).unwrap();
        assert_eq!(catalog.root(), Path::new("/from/flag"));

        let catalog = config.catalog(None).unwrap();
        assert_eq!(catalog.root(), Path::new("/from/config"));
    }

    #[test]
    fn test_relative_catalog_root_is_made_absolute() {
        let mut config = Config::default();
        config.templates.root = Some(PathBuf::from("vendor/../templates"));

        let catalog = config.catalog(None).unwrap();

        assert!(catalog.root().is_absolute());
        assert_eq!(
            catalog.root(),
            std::env::current_dir().unwrap().join("templates")
        );

        let catalog = config.catalog(Some(Path::new("./flag-templates"))).unwrap();
        assert!(catalog.root().is_absolute());
        assert!(catalog.root().ends_with("flag-templates"));
    }

    #[test]
    fn test_install_policy_from_config() {
        let mut config = Config::default();
        config.install.copy_instead = vec!["README.md".to_string()];
        let policy = config.install_policy();
        assert_eq!(policy.copy_instead(), ["README.md".to_string()]);
    }
}
