//! Platform API seam
//!
//! The deploy flow only talks to the platform through [`PlatformApi`], so it
//! can run against the HTTP client or an in-memory fake.

use std::future::Future;

use async_trait::async_trait;
use openapi_client::{Account, App, AppCreateRequest, AppUpdateRequest, AppsPage, Deployment};
use tokio_util::sync::CancellationToken;

use crate::errors::DeployError;
use crate::http::client::HttpClient;

/// Page request for listing apps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
}

/// Control-plane operations of the hosting platform
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// List one page of apps
    async fn list_apps(&self, options: ListOptions) -> Result<AppsPage, DeployError>;

    /// Get an app by id
    async fn get_app(&self, app_id: &str) -> Result<App, DeployError>;

    /// Get one deployment of an app
    async fn get_deployment(&self, app_id: &str, deployment_id: &str)
        -> Result<Deployment, DeployError>;

    /// Create an app
    async fn create_app(&self, request: &AppCreateRequest) -> Result<App, DeployError>;

    /// Update an existing app
    async fn update_app(&self, app_id: &str, request: &AppUpdateRequest)
        -> Result<App, DeployError>;

    /// Delete an app
    async fn delete_app(&self, app_id: &str) -> Result<(), DeployError>;

    /// Get the account the credential belongs to
    async fn get_account(&self) -> Result<Account, DeployError>;
}

#[async_trait]
impl PlatformApi for HttpClient {
    async fn list_apps(&self, options: ListOptions) -> Result<AppsPage, DeployError> {
        self.list_apps_page(options.page, options.per_page).await
    }

    async fn get_app(&self, app_id: &str) -> Result<App, DeployError> {
        self.get_app_by_id(app_id).await
    }

    async fn get_deployment(
        &self,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployError> {
        self.get_app_deployment(app_id, deployment_id).await
    }

    async fn create_app(&self, request: &AppCreateRequest) -> Result<App, DeployError> {
        self.create_app_from_spec(request).await
    }

    async fn update_app(
        &self,
        app_id: &str,
        request: &AppUpdateRequest,
    ) -> Result<App, DeployError> {
        self.update_app_spec(app_id, request).await
    }

    async fn delete_app(&self, app_id: &str) -> Result<(), DeployError> {
        self.delete_app_by_id(app_id).await
    }

    async fn get_account(&self) -> Result<Account, DeployError> {
        self.current_account().await
    }
}

/// Run a remote call unless `cancel` fires first
pub async fn cancellable<T, F>(cancel: &CancellationToken, request: F) -> Result<T, DeployError>
where
    F: Future<Output = Result<T, DeployError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeployError::Cancelled),
        result = request => result,
    }
}

/// Like [`cancellable`], wrapping failures with the operation and its target
pub async fn call<T, F>(
    cancel: &CancellationToken,
    operation: &'static str,
    target: &str,
    request: F,
) -> Result<T, DeployError>
where
    F: Future<Output = Result<T, DeployError>>,
{
    cancellable(cancel, request)
        .await
        .map_err(|e| DeployError::api(operation, target, e))
}
