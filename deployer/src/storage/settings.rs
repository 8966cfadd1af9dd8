//! Settings file management

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::deploy::fsm::FsmSettings;
use crate::deploy::locator::LocatorOptions;
use crate::errors::DeployError;
use crate::http::client::DEFAULT_BASE_URL;
use crate::logs::LogLevel;
use crate::models::deployment::{DesiredSpec, DEFAULT_BASE_PATH, DEFAULT_HTTP_PORT};

/// Environment variable consulted when no access token is configured
pub const ACCESS_TOKEN_ENV: &str = "DIGITALOCEAN_ACCESS_TOKEN";

/// Tool settings
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Platform API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// What to deploy
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Existing app lookup
    #[serde(default)]
    pub locator: LocatorSettings,

    /// Rollout polling
    #[serde(default)]
    pub poller: PollerSettings,
}

/// Platform API settings
#[derive(Debug, Deserialize)]
pub struct ApiSettings {
    /// Base URL for the platform API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token; falls back to `DIGITALOCEAN_ACCESS_TOKEN`
    #[serde(default)]
    pub access_token: Option<SecretString>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
        }
    }
}

impl ApiSettings {
    /// Configured token, else the environment token. Empty values count as missing.
    pub fn resolve_access_token(&self, from_env: Option<String>) -> Result<SecretString, DeployError> {
        if let Some(token) = &self.access_token {
            if !token.expose_secret().is_empty() {
                return Ok(SecretString::from(token.expose_secret().to_string()));
            }
        }

        match from_env {
            Some(token) if !token.is_empty() => Ok(SecretString::from(token)),
            _ => Err(DeployError::ConfigError(format!(
                "no access token configured and {} is not set",
                ACCESS_TOKEN_ENV
            ))),
        }
    }
}

/// Desired app settings
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DeploySettings {
    /// App name; defaults to the application name given on the command line
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub instance_size_slug: String,

    #[serde(default)]
    pub instance_count: i64,

    /// 0 means 8080
    #[serde(default)]
    pub http_port: i64,

    /// Empty means "/"
    #[serde(default)]
    pub path: String,
}

impl DeploySettings {
    /// Apply defaults and validate into a `DesiredSpec`
    pub fn resolve(&self, fallback_name: Option<&str>) -> Result<DesiredSpec, DeployError> {
        let name = if self.name.is_empty() {
            fallback_name.unwrap_or_default().to_string()
        } else {
            self.name.clone()
        };

        if name.is_empty() {
            return Err(DeployError::ConfigError("app name is required".to_string()));
        }
        if self.instance_count < 0 {
            return Err(DeployError::ConfigError(format!(
                "instance_count must not be negative, got {}",
                self.instance_count
            )));
        }
        if self.http_port < 0 {
            return Err(DeployError::ConfigError(format!(
                "http_port must not be negative, got {}",
                self.http_port
            )));
        }

        Ok(DesiredSpec {
            name,
            region: self.region.clone(),
            instance_size_slug: self.instance_size_slug.clone(),
            instance_count: self.instance_count,
            http_port: if self.http_port == 0 {
                DEFAULT_HTTP_PORT
            } else {
                self.http_port
            },
            base_path: if self.path.is_empty() {
                DEFAULT_BASE_PATH.to_string()
            } else {
                self.path.clone()
            },
        })
    }
}

/// Locator settings
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub strict_name_match: bool,
}

fn default_page_size() -> u32 {
    200
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            strict_name_match: false,
        }
    }
}

impl From<&LocatorSettings> for LocatorOptions {
    fn from(settings: &LocatorSettings) -> Self {
        Self {
            per_page: settings.page_size,
            strict_name_match: settings.strict_name_match,
        }
    }
}

/// Poller settings
#[derive(Debug, Clone, Deserialize)]
pub struct PollerSettings {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_timeout() -> u64 {
    1800
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TryFrom<&PollerSettings> for FsmSettings {
    type Error = DeployError;

    fn try_from(settings: &PollerSettings) -> Result<Self, Self::Error> {
        let fsm_settings = Self {
            poll_interval: std::time::Duration::from_secs(settings.interval_secs),
            deployment_timeout: std::time::Duration::from_secs(settings.timeout_secs),
        };
        fsm_settings.validate()?;
        Ok(fsm_settings)
    }
}
