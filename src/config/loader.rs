// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BIND_ADDR, DEFAULT_NONCE_LIFETIME_SECS, DEFAULT_PUBLIC_BASE_URL, NONCE_SECRET_ENV,
};
use crate::errors::ConfigError;
use crate::registry::WidgetRegistry;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure for the widget host.
///
/// # Fields
/// * `server` - Listen address and public URL (optional)
/// * `nonce` - Token secret and lifetime
/// * `widgets` - Widget instances placed on the index page
///
/// # Example
/// ```yaml
/// server:
///   bind_addr: "127.0.0.1:8080"
///   public_base_url: "http://127.0.0.1:8080/"
/// nonce:
///   secret: "change-me-to-something-long"
///   lifetime_seconds: 86400
/// widgets:
///   - class: echo
///     id: echo-1
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nonce: NonceConfig,
    #[serde(default)]
    pub widgets: Vec<WidgetInstanceConfig>,
}

/// HTTP host options.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Base used to rebuild absolute request URLs behind proxies.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_string()
}

/// Nonce secret and lifetime.
///
/// When `secret` is omitted it is read from `WIDGET_AJAX_NONCE_SECRET`.
#[derive(Debug, Deserialize)]
pub struct NonceConfig {
    pub secret: Option<String>,
    #[serde(default = "default_lifetime")]
    pub lifetime_seconds: u64,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            secret: None,
            lifetime_seconds: default_lifetime(),
        }
    }
}

fn default_lifetime() -> u64 {
    DEFAULT_NONCE_LIFETIME_SECS
}

impl NonceConfig {
    /// Secret from the file, falling back to the environment.
    ///
    /// An empty secret in the file counts as absent.
    pub fn resolve_secret(&self) -> Option<String> {
        self.resolve_secret_with(|| std::env::var(NONCE_SECRET_ENV).ok())
    }

    fn resolve_secret_with<F>(&self, fallback: F) -> Option<String>
    where
        F: FnOnce() -> Option<String>,
    {
        self.secret
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(fallback)
            .filter(|s| !s.is_empty())
    }
}

/// A widget instance placed on the index page.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WidgetInstanceConfig {
    /// Registered widget class name
    pub class: String,
    pub id: String,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config and validate it against the registered widget classes.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
    registry: &WidgetRegistry,
) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg, registry).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
