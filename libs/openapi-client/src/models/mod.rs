//! API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declarative application specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<AppServiceSpec>,
}

/// A long-running service component of an app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppServiceSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSourceSpec>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance_size_slug: String,
    #[serde(default)]
    pub instance_count: i64,
    #[serde(default)]
    pub http_port: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<AppRouteSpec>,
}

/// Container registry type of an image source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageSourceSpecRegistryType {
    #[default]
    Unspecified,
    DockerHub,
    /// DigitalOcean Container Registry
    Docr,
    Ghcr,
}

/// Image source of a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSourceSpec {
    #[serde(default)]
    pub registry_type: ImageSourceSpecRegistryType,
    #[serde(default)]
    pub registry: String,
    pub repository: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// HTTP route of a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRouteSpec {
    pub path: String,
}

/// An application as reported by the platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    #[serde(default)]
    pub owner_uuid: Option<String>,
    #[serde(default)]
    pub spec: AppSpec,
    #[serde(default)]
    pub default_ingress: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub live_url_base: Option<String>,
    #[serde(default)]
    pub active_deployment: Option<Deployment>,
    #[serde(default)]
    pub in_progress_deployment: Option<Deployment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single rollout of an app spec
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub progress: Option<DeploymentProgress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Step counters of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentProgress {
    #[serde(default)]
    pub pending_steps: i64,
    #[serde(default)]
    pub running_steps: i64,
    #[serde(default)]
    pub success_steps: i64,
    #[serde(default)]
    pub error_steps: i64,
    #[serde(default)]
    pub total_steps: i64,
}

/// Body of `POST /v2/apps`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCreateRequest {
    pub spec: AppSpec,
}

/// Body of `PUT /v2/apps/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUpdateRequest {
    pub spec: AppSpec,
}

/// Envelope for single-app responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppResponse {
    pub app: App,
}

/// Envelope for single-deployment responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResponse {
    pub deployment: Deployment,
}

/// One page of `GET /v2/apps`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppsPage {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Pagination links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

impl Links {
    /// Whether these links describe the final page of a listing
    pub fn is_last_page(&self) -> bool {
        match &self.pages {
            None => true,
            Some(pages) => pages.last.is_empty(),
        }
    }
}

/// Page URLs relative to the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prev: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last: String,
}

/// Listing metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: i64,
}

/// Account owning the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub uuid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Envelope for `GET /v2/account`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
}

/// Error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}
