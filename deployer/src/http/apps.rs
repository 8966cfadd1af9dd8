//! App Platform endpoints

use openapi_client::{
    Account, AccountResponse, App, AppCreateRequest, AppResponse, AppUpdateRequest, AppsPage,
    Deployment, DeploymentResponse,
};

use crate::errors::DeployError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// List one page of apps
    pub async fn list_apps_page(&self, page: u32, per_page: u32) -> Result<AppsPage, DeployError> {
        let path = format!("/v2/apps?page={}&per_page={}", page, per_page);
        self.get(&path).await
    }

    /// Get an app by id
    pub async fn get_app_by_id(&self, app_id: &str) -> Result<App, DeployError> {
        let path = format!("/v2/apps/{}", app_id);
        let response: AppResponse = self.get(&path).await?;
        Ok(response.app)
    }

    /// Get one deployment of an app
    pub async fn get_app_deployment(
        &self,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployError> {
        let path = format!("/v2/apps/{}/deployments/{}", app_id, deployment_id);
        let response: DeploymentResponse = self.get(&path).await?;
        Ok(response.deployment)
    }

    /// Create a new app
    pub async fn create_app_from_spec(&self, request: &AppCreateRequest) -> Result<App, DeployError> {
        let response: AppResponse = self.post("/v2/apps", request).await?;
        Ok(response.app)
    }

    /// Replace the spec of an existing app, triggering a new deployment
    pub async fn update_app_spec(
        &self,
        app_id: &str,
        request: &AppUpdateRequest,
    ) -> Result<App, DeployError> {
        let path = format!("/v2/apps/{}", app_id);
        let response: AppResponse = self.put(&path, request).await?;
        Ok(response.app)
    }

    /// Delete an app
    pub async fn delete_app_by_id(&self, app_id: &str) -> Result<(), DeployError> {
        let path = format!("/v2/apps/{}", app_id);
        self.delete(&path).await
    }

    /// Get the account owning the token
    pub async fn current_account(&self) -> Result<Account, DeployError> {
        let response: AccountResponse = self.get("/v2/account").await?;
        Ok(response.account)
    }
}
