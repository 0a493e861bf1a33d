// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Console configuration
//!
//! Resolution order (later wins):
//! 1. Built-in default backend URL
//! 2. YAML config file (`--config`, else discovered via `R2R_CONFIG_PATH`,
//!    `./r2r-config.yaml`, `~/.r2r/config.yaml`)
//! 3. Environment overrides (`R2R_SKIP_TUNNEL_WARNING`)
//! 4. Command-line flags (`--backend-url`, `--license-key`, which also read
//!    `R2R_BACKEND_URL` / `R2R_LICENSE_KEY` through clap)

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Fallback when neither file, environment nor flags name a backend
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Absolute http(s) base URL of the swarm backend
    pub backend_url: String,
    /// Sent as `X-License-Key` on every request
    pub license_key: Option<String>,
    /// Adds the header that skips the tunnel provider's interstitial page
    pub skip_tunnel_warning: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            license_key: None,
            skip_tunnel_warning: false,
        }
    }
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    backend_url: Option<String>,
    license_key: Option<String>,
    skip_tunnel_warning: Option<bool>,
}

/// Values supplied on the command line
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub license_key: Option<String>,
}

impl ConsoleConfig {
    /// Load configuration from file, environment and flags, then validate
    pub fn load(cli_path: Option<PathBuf>, overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = if let Some(path) = cli_path {
            // Explicit path must exist
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)
                .with_context(|| format!("Failed to load config at {:?}", path))?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        // An empty file deserializes to unit, not a mapping
        let file: ConfigFile = if yaml.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(yaml).context("Failed to parse config YAML")?
        };

        let defaults = Self::default();
        Ok(Self {
            backend_url: file.backend_url.unwrap_or(defaults.backend_url),
            license_key: file.license_key,
            skip_tunnel_warning: file.skip_tunnel_warning.unwrap_or(defaults.skip_tunnel_warning),
        })
    }

    /// Discover configuration file using precedence order
    /// 1. R2R_CONFIG_PATH environment variable
    /// 2. ./r2r-config.yaml (working directory)
    /// 3. ~/.r2r/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("R2R_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!("R2R_CONFIG_PATH points at missing file {:?}, ignoring", path);
        }

        let cwd = PathBuf::from("./r2r-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".r2r").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Apply environment variable overrides not covered by clap flags
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("R2R_SKIP_TUNNEL_WARNING") {
            match parse_bool(&val) {
                Some(flag) => {
                    tracing::info!("Environment override: R2R_SKIP_TUNNEL_WARNING={}", flag);
                    self.skip_tunnel_warning = flag;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for R2R_SKIP_TUNNEL_WARNING: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.backend_url {
            self.backend_url = url;
        }
        if let Some(key) = overrides.license_key {
            self.license_key = Some(key);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.backend_url)
            .with_context(|| format!("Invalid backend URL: '{}'", self.backend_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Invalid backend URL scheme '{}': expected http or https",
                url.scheme()
            );
        }
        if url.host_str().is_none() {
            anyhow::bail!("Backend URL '{}' has no host", self.backend_url);
        }

        if let Some(key) = &self.license_key {
            if key.trim().is_empty() {
                anyhow::bail!("License key is set but empty");
            }
        }

        Ok(())
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConsoleConfig::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(config.license_key.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_yaml_fields() {
        let config = ConsoleConfig::from_yaml_str(
            "backend_url: https://swarm.example.com\nlicense_key: abc123\nskip_tunnel_warning: true\n",
        )
        .unwrap();
        assert_eq!(config.backend_url, "https://swarm.example.com");
        assert_eq!(config.license_key.as_deref(), Some("abc123"));
        assert!(config.skip_tunnel_warning);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = ConsoleConfig::from_yaml_str("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ConsoleConfig::from_yaml_str("backend: http://x\n").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = ConsoleConfig::from_yaml_str("license_key: from-file\n").unwrap();
        config.apply_overrides(ConfigOverrides {
            backend_url: Some("http://10.0.0.5:9000".to_string()),
            license_key: None,
        });
        assert_eq!(config.backend_url, "http://10.0.0.5:9000");
        assert_eq!(config.license_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_relative_url_rejected() {
        let config = ConsoleConfig {
            backend_url: "/api".to_string(),
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = ConsoleConfig {
            backend_url: "ftp://example.com".to_string(),
            ..ConsoleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_blank_license_key_rejected() {
        let config = ConsoleConfig {
            license_key: Some("  ".to_string()),
            ..ConsoleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stale_config_path_env_is_ignored() {
        let missing = std::env::temp_dir().join("r2r-missing-dir").join("config.yaml");
        std::env::set_var("R2R_CONFIG_PATH", &missing);
        let discovered = ConsoleConfig::discover_config();
        std::env::remove_var("R2R_CONFIG_PATH");
        assert_ne!(discovered, Some(missing));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
