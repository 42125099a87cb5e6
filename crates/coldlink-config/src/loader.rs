// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file
//! 2. Parse it according to the extension (YAML, TOML, or JSON)
//! 3. Validate the resulting [`ColdlinkConfig`]

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::ColdlinkConfig;

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`).
    Yaml,
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Loads and validates a configuration file.
///
/// # Examples
///
/// ```no_run
/// let config = coldlink_config::load_config("coldlink.yaml").unwrap();
/// assert!(config.forwarder.enabled);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ColdlinkConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ConfigFormat::from_path(path)?;
    let config = parse_content(&content, format, path)?;

    config.validate()?;

    Ok(config)
}

fn parse_content(content: &str, format: ConfigFormat, path: &Path) -> ConfigResult<ColdlinkConfig> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse(path, e.to_string())),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::parse(path, e.to_string()))
        }
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::parse(path, e.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "coldlink.yaml",
            r#"
api:
  port: 9000
forwarder:
  interval_ms: 250
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.forwarder.interval_ms, 250);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.simulator.topology.unit_count(), 4);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "coldlink.json", r#"{"api": {"port": 8123}}"#);

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.port, 8123);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "coldlink.toml", "[api]\nport = 8222\n");

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.port, 8222);
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "coldlink.yaml",
            "forwarder:\n  target: nonsense\n",
        );

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "coldlink.yaml", "surprise: true\n");

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/definitely/missing.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
