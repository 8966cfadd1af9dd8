//! HTTP client implementation

use reqwest::{header, Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::DeployError;

/// Public API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com";

/// HTTP client for the App Platform control API
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client authenticated with `token`
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("appdeploy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            header::AUTHORIZATION,
            format!("Bearer {}", self.token.expose_secret()),
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        Self::json_body("GET", response).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        Self::json_body("POST", response).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("PUT {}", url);

        let response = self
            .authorized(self.client.put(&url))
            .json(body)
            .send()
            .await?;
        Self::json_body("PUT", response).await
    }

    /// Make a DELETE request, discarding any response body
    pub async fn delete(&self, path: &str) -> Result<(), DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("DELETE {}", url);

        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check_status("DELETE", response).await?;
        Ok(())
    }

    async fn json_body<T: DeserializeOwned>(
        verb: &str,
        response: reqwest::Response,
    ) -> Result<T, DeployError> {
        let response = Self::check_status(verb, response).await?;
        let body = response.json().await?;
        Ok(body)
    }

    async fn check_status(
        verb: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DeployError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("HTTP {} failed: {} - {}", verb, status, body);

        // Prefer the API's own message when the body is a standard error document
        let body = match serde_json::from_str::<openapi_client::ErrorResponse>(&body) {
            Ok(err) => format!("{} ({})", err.message, err.id),
            Err(_) => body,
        };

        Err(DeployError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}
