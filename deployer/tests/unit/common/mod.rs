//! In-memory platform used by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Ready;
use std::sync::Mutex;
use std::time::Duration;

use appdeploy::errors::DeployError;
use appdeploy::platform::{ListOptions, PlatformApi};
use appdeploy::status::StatusSink;
use async_trait::async_trait;
use openapi_client::{
    Account, App, AppCreateRequest, AppSpec, AppUpdateRequest, AppsPage, Deployment,
    DeploymentProgress, Links, Pages,
};

/// A recorded platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListApps(u32),
    GetApp(String),
    GetDeployment(String, String),
    CreateApp(String),
    UpdateApp(String),
    DeleteApp(String),
    GetAccount,
}

#[derive(Default)]
struct Inner {
    pages: Vec<AppsPage>,
    list_error_on_page: Option<u32>,
    app_snapshots: VecDeque<App>,
    deployments: VecDeque<Deployment>,
    deployment_error: bool,
    create_error: bool,
    delete_error: Option<u16>,
    account: Option<Account>,
    created_id: String,
    submitted_specs: Vec<AppSpec>,
    calls: Vec<Call>,
}

/// Scripted platform. `get_app` and `get_deployment` replay their queues,
/// repeating the last entry once only one is left.
#[derive(Default)]
pub struct FakePlatform {
    inner: Mutex<Inner>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.inner.lock().unwrap().created_id = "app-new".to_string();
        platform
    }

    pub fn with_pages(self, pages: Vec<AppsPage>) -> Self {
        self.inner.lock().unwrap().pages = pages;
        self
    }

    pub fn with_apps(self, apps: Vec<App>, per_page: usize) -> Self {
        self.with_pages(paginate(apps, per_page))
    }

    pub fn with_list_error_on_page(self, page: u32) -> Self {
        self.inner.lock().unwrap().list_error_on_page = Some(page);
        self
    }

    pub fn with_app_snapshots(self, snapshots: Vec<App>) -> Self {
        self.inner.lock().unwrap().app_snapshots = snapshots.into();
        self
    }

    pub fn with_deployments(self, deployments: Vec<Deployment>) -> Self {
        self.inner.lock().unwrap().deployments = deployments.into();
        self
    }

    pub fn with_deployment_error(self) -> Self {
        self.inner.lock().unwrap().deployment_error = true;
        self
    }

    pub fn with_create_error(self) -> Self {
        self.inner.lock().unwrap().create_error = true;
        self
    }

    pub fn with_delete_error(self, status: u16) -> Self {
        self.inner.lock().unwrap().delete_error = Some(status);
        self
    }

    pub fn with_account(self, account: Account) -> Self {
        self.inner.lock().unwrap().account = Some(account);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn submitted_specs(&self) -> Vec<AppSpec> {
        self.inner.lock().unwrap().submitted_specs.clone()
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

fn replay<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn server_error() -> DeployError {
    DeployError::HttpStatus {
        status: 500,
        body: "internal error".to_string(),
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn list_apps(&self, options: ListOptions) -> Result<AppsPage, DeployError> {
        self.record(Call::ListApps(options.page));
        let inner = self.inner.lock().unwrap();

        if inner.list_error_on_page == Some(options.page) {
            return Err(server_error());
        }

        Ok(inner
            .pages
            .get(options.page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_app(&self, app_id: &str) -> Result<App, DeployError> {
        self.record(Call::GetApp(app_id.to_string()));
        let mut inner = self.inner.lock().unwrap();
        replay(&mut inner.app_snapshots)
            .ok_or_else(|| DeployError::NotFound(app_id.to_string()))
    }

    async fn get_deployment(
        &self,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployError> {
        self.record(Call::GetDeployment(
            app_id.to_string(),
            deployment_id.to_string(),
        ));
        let mut inner = self.inner.lock().unwrap();

        if inner.deployment_error {
            return Err(server_error());
        }

        replay(&mut inner.deployments)
            .ok_or_else(|| DeployError::NotFound(deployment_id.to_string()))
    }

    async fn create_app(&self, request: &AppCreateRequest) -> Result<App, DeployError> {
        self.record(Call::CreateApp(request.spec.name.clone()));
        let mut inner = self.inner.lock().unwrap();

        if inner.create_error {
            return Err(DeployError::HttpStatus {
                status: 422,
                body: "invalid spec".to_string(),
            });
        }

        inner.submitted_specs.push(request.spec.clone());
        Ok(App {
            id: inner.created_id.clone(),
            spec: request.spec.clone(),
            ..Default::default()
        })
    }

    async fn update_app(
        &self,
        app_id: &str,
        request: &AppUpdateRequest,
    ) -> Result<App, DeployError> {
        self.record(Call::UpdateApp(app_id.to_string()));
        let mut inner = self.inner.lock().unwrap();

        inner.submitted_specs.push(request.spec.clone());
        Ok(App {
            id: app_id.to_string(),
            spec: request.spec.clone(),
            ..Default::default()
        })
    }

    async fn delete_app(&self, app_id: &str) -> Result<(), DeployError> {
        self.record(Call::DeleteApp(app_id.to_string()));
        let inner = self.inner.lock().unwrap();

        match inner.delete_error {
            Some(status) => Err(DeployError::HttpStatus {
                status,
                body: "app not found".to_string(),
            }),
            None => Ok(()),
        }
    }

    async fn get_account(&self) -> Result<Account, DeployError> {
        self.record(Call::GetAccount);
        let inner = self.inner.lock().unwrap();
        inner.account.clone().ok_or_else(|| DeployError::HttpStatus {
            status: 401,
            body: "unauthorized".to_string(),
        })
    }
}

/// Status sink that keeps every line
#[derive(Default)]
pub struct RecordingStatus {
    lines: Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl StatusSink for RecordingStatus {
    fn update(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn step_ok(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

/// Sleep that returns immediately, so every tick runs back to back
pub fn instant_sleep(_: Duration) -> Ready<()> {
    std::future::ready(())
}

pub fn app(id: &str, name: &str) -> App {
    App {
        id: id.to_string(),
        spec: AppSpec {
            name: name.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn app_rolling_out(id: &str, name: &str, deployment_id: &str) -> App {
    App {
        in_progress_deployment: Some(Deployment {
            id: deployment_id.to_string(),
            ..Default::default()
        }),
        ..app(id, name)
    }
}

pub fn app_live(id: &str, name: &str, deployment_id: &str) -> App {
    App {
        default_ingress: Some(format!("https://{}.ondigitalocean.app", name)),
        live_url: Some(format!("https://{}.example.com", name)),
        active_deployment: Some(Deployment {
            id: deployment_id.to_string(),
            phase: "ACTIVE".to_string(),
            ..Default::default()
        }),
        ..app(id, name)
    }
}

pub fn deployment(id: &str, phase: &str, success: i64, error: i64, total: i64) -> Deployment {
    Deployment {
        id: id.to_string(),
        phase: phase.to_string(),
        progress: Some(DeploymentProgress {
            success_steps: success,
            error_steps: error,
            total_steps: total,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn page_url(page: usize) -> String {
    format!("https://api.digitalocean.com/v2/apps?page={}&per_page=2", page)
}

/// Split `apps` into pages linked the way the API links them
pub fn paginate(apps: Vec<App>, per_page: usize) -> Vec<AppsPage> {
    let chunks: Vec<Vec<App>> = apps.chunks(per_page).map(|c| c.to_vec()).collect();
    let total = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, apps)| {
            let page = i + 1;
            let links = if total <= 1 {
                None
            } else {
                Some(Links {
                    pages: Some(Pages {
                        first: if page > 1 { page_url(1) } else { String::new() },
                        prev: if page > 1 { page_url(page - 1) } else { String::new() },
                        next: if page < total { page_url(page + 1) } else { String::new() },
                        last: if page < total { page_url(total) } else { String::new() },
                    }),
                })
            };
            AppsPage {
                apps,
                links,
                meta: None,
            }
        })
        .collect()
}
