//! Deployment models

use std::fmt;

use openapi_client::{App, ImageSourceSpecRegistryType};
use serde::{Deserialize, Serialize};

use crate::errors::DeployError;

/// Default HTTP port of the service
pub const DEFAULT_HTTP_PORT: i64 = 8080;

/// Default route of the service
pub const DEFAULT_BASE_PATH: &str = "/";

/// What the caller wants running on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSpec {
    /// App name, unique per account
    pub name: String,
    pub region: String,
    pub instance_size_slug: String,
    pub instance_count: i64,
    pub http_port: i64,
    pub base_path: String,
}

impl DesiredSpec {
    /// Create a desired spec with the default port and route
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: String::new(),
            instance_size_slug: String::new(),
            instance_count: 0,
            http_port: DEFAULT_HTTP_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

/// Container image produced by the build step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Repository, optionally prefixed with a registry host
    pub image: String,
    pub tag: String,
}

/// Where the platform should pull the image from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    /// Empty for the platform's own registry
    pub registry_host: String,
    pub repository_path: String,
    pub registry_kind: ImageSourceSpecRegistryType,
    pub tag: String,
}

/// The fields of a remote app the deploy flow reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteApplication {
    pub id: String,
    pub name: String,
    /// In-progress deployment, if the platform has started rolling out
    pub current_deployment_id: Option<String>,
    pub active_deployment_id: Option<String>,
    pub default_ingress: Option<String>,
    pub live_url: Option<String>,
}

impl From<App> for RemoteApplication {
    fn from(app: App) -> Self {
        Self {
            id: app.id,
            name: app.spec.name,
            current_deployment_id: app.in_progress_deployment.map(|d| d.id),
            active_deployment_id: app.active_deployment.map(|d| d.id),
            default_ingress: app.default_ingress,
            live_url: app.live_url,
        }
    }
}

/// Latest step counters of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentProgress {
    pub phase: String,
    pub total_steps: i64,
    pub succeeded_steps: i64,
    pub failed_steps: i64,
}

impl From<&openapi_client::Deployment> for DeploymentProgress {
    fn from(deployment: &openapi_client::Deployment) -> Self {
        let progress = deployment.progress.clone().unwrap_or_default();
        Self {
            phase: deployment.phase.clone(),
            total_steps: progress.total_steps,
            succeeded_steps: progress.success_steps,
            failed_steps: progress.error_steps,
        }
    }
}

impl fmt::Display for DeploymentProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phase={} success_steps={} error_steps={} total_steps={}",
            self.phase, self.succeeded_steps, self.failed_steps, self.total_steps
        )
    }
}

/// Terminal result of one deploy invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Success(RemoteApplication),
    Failed { reason: String },
    TimedOut { app_id: String },
}

impl DeploymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Success(_))
    }

    /// Snapshot a successful outcome as a `Deployment`; other outcomes become errors
    pub fn into_deployment(self, app_name: &str) -> Result<Deployment, DeployError> {
        match self {
            DeploymentOutcome::Success(app) => Ok(Deployment::from_app(app_name, &app)),
            DeploymentOutcome::Failed { reason } => Err(DeployError::RolloutFailed(reason)),
            DeploymentOutcome::TimedOut { app_id } => Err(DeployError::Timeout { app_id }),
        }
    }
}

/// A converged app, handed to the release step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub app_id: String,
    pub app_name: String,
    pub default_ingress: String,
    pub live_url: String,
    pub active_deployment_id: String,
}

impl Deployment {
    fn from_app(app_name: &str, app: &RemoteApplication) -> Self {
        Self {
            app_id: app.id.clone(),
            app_name: app_name.to_string(),
            default_ingress: app.default_ingress.clone().unwrap_or_default(),
            live_url: app.live_url.clone().unwrap_or_default(),
            active_deployment_id: app.active_deployment_id.clone().unwrap_or_default(),
        }
    }
}

/// Handle of a released app, used for teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub app_id: String,
    pub url: String,
}
