//! Configuration loading for fp-core.
//!
//! This module handles:
//! - The fingerprint [`Configuration`] (requested output version)
//! - Config resolution order (CLI > env > config file > defaults)
//! - The declarative version table (see [`versions`])

pub mod versions;

pub use versions::{
    is_append_only, labels, validate_version_table, Category, VersionEntry,
};

use fp_common::Version;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "fingerprint";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the output version.
pub const VERSION_ENV: &str = "FP_VERSION";

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "FINGERPRINT_CONFIG";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid version from {origin}: {source}")]
    InvalidVersion {
        origin: String,
        #[source]
        source: fp_common::Error,
    },
}

/// What the tree builder should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Output version; defaults to the latest.
    #[serde(default)]
    pub version: Version,
}

impl Configuration {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Labels `category` emits under this configuration.
    pub fn labels(&self, category: Category) -> &'static [&'static str] {
        category.labels(self.version)
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    File(PathBuf),
    Default,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub configuration: Configuration,
    pub source: ConfigSource,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Version given on the command line (highest priority).
    pub version: Option<String>,
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit CLI version (via ConfigOptions)
/// 2. `FP_VERSION` environment variable
/// 3. Config file: explicit path, `FINGERPRINT_CONFIG`, or
///    `$XDG_CONFIG_HOME/fingerprint/config.json`
/// 4. Built-in defaults
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let env_version = std::env::var(VERSION_ENV).ok();
    let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
    resolve(options, env_version.as_deref(), env_path, default_config_path())
}

/// Resolution with the environment passed in explicitly.
fn resolve(
    options: &ConfigOptions,
    env_version: Option<&str>,
    env_path: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(version) = &options.version {
        return Ok(ResolvedConfig {
            configuration: Configuration::new(parse_version(version, "command line")?),
            source: ConfigSource::Cli,
        });
    }

    if let Some(version) = env_version {
        return Ok(ResolvedConfig {
            configuration: Configuration::new(parse_version(version, VERSION_ENV)?),
            source: ConfigSource::Env,
        });
    }

    // Explicit paths must exist; the default location is optional.
    if let Some(path) = options.config_path.clone().or(env_path) {
        let configuration = load_config_file(&path)?;
        return Ok(ResolvedConfig {
            configuration,
            source: ConfigSource::File(path),
        });
    }

    if let Some(path) = default_path.filter(|path| path.exists()) {
        let configuration = load_config_file(&path)?;
        return Ok(ResolvedConfig {
            configuration,
            source: ConfigSource::File(path),
        });
    }

    debug!("no configuration found, using defaults");
    Ok(ResolvedConfig {
        configuration: Configuration::default(),
        source: ConfigSource::Default,
    })
}

fn parse_version(value: &str, origin: &str) -> Result<Version, ConfigError> {
    value
        .parse::<Version>()
        .map_err(|source| ConfigError::InvalidVersion {
            origin: origin.to_string(),
            source,
        })
}

/// Read and parse a JSON config file.
pub fn load_config_file(path: &Path) -> Result<Configuration, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// `$XDG_CONFIG_HOME/fingerprint/config.json`, falling back to `~/.config`.
fn default_config_path() -> Option<PathBuf> {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(config_home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_configuration_is_latest() {
        assert_eq!(Configuration::default().version, Version::LATEST);
    }

    #[test]
    fn test_cli_wins_over_env_and_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"version": "v1"}"#);
        let options = ConfigOptions {
            version: Some("v2".into()),
            config_path: Some(path),
        };
        let resolved = resolve(&options, Some("v3"), None, None).unwrap();
        assert_eq!(resolved.configuration.version, Version::V2);
        assert_eq!(resolved.source, ConfigSource::Cli);
    }

    #[test]
    fn test_env_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"version": "v1"}"#);
        let resolved = resolve(&ConfigOptions::default(), Some("2"), Some(path), None).unwrap();
        assert_eq!(resolved.configuration.version, Version::V2);
        assert_eq!(resolved.source, ConfigSource::Env);
    }

    #[test]
    fn test_file_configuration() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"version": "v1"}"#);
        let options = ConfigOptions {
            version: None,
            config_path: Some(path.clone()),
        };
        let resolved = resolve(&options, None, None, None).unwrap();
        assert_eq!(resolved.configuration.version, Version::V1);
        assert_eq!(resolved.source, ConfigSource::File(path));
    }

    #[test]
    fn test_empty_file_uses_default_version() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{}");
        let resolved = resolve(&ConfigOptions::default(), None, Some(path), None).unwrap();
        assert_eq!(resolved.configuration.version, Version::LATEST);
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve(
            &ConfigOptions::default(),
            None,
            None,
            Some(dir.path().join("absent.json")),
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Default);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let options = ConfigOptions {
            version: None,
            config_path: Some(dir.path().join("absent.json")),
        };
        let err = resolve(&options, None, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_unknown_version_is_error() {
        let options = ConfigOptions {
            version: Some("v42".into()),
            config_path: None,
        };
        let err = resolve(&options, None, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion { .. }));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"version": "v1", "extra": true}"#);
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_version_in_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"version": "v9"}"#);
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_file_accepts_same_spellings_as_cli() {
        let dir = TempDir::new().unwrap();
        for raw in ["2", "V2", "v2"] {
            let path = write_config(&dir, &format!(r#"{{"version": "{raw}"}}"#));
            let from_file = load_config_file(&path).unwrap().version;
            assert_eq!(from_file, parse_version(raw, "command line").unwrap());
        }
    }
}
