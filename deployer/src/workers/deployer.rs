//! Deploy invocation: locate, dispatch, poll

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::deploy::dispatch::create_or_update;
use crate::deploy::fsm::FsmSettings;
use crate::deploy::image::resolve_image;
use crate::deploy::locator::{find_existing_app, LocatorOptions};
use crate::deploy::lock::NameLocks;
use crate::deploy::spec::build_app_spec;
use crate::errors::DeployError;
use crate::models::deployment::{DeploymentOutcome, DesiredSpec, ImageRef};
use crate::platform::PlatformApi;
use crate::status::StatusSink;
use crate::workers::poller::wait_for_deployment;

/// Deployer options
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Existing app lookup
    pub locator: LocatorOptions,

    /// Rollout polling
    pub fsm_settings: FsmSettings,
}

/// Runs deploy invocations against one platform client.
///
/// Holds no state between invocations besides the shared name locks.
pub struct Deployer<P: PlatformApi + ?Sized> {
    platform: Arc<P>,
    locks: Arc<NameLocks>,
    options: Options,
}

impl<P: PlatformApi + ?Sized> Deployer<P> {
    pub fn new(platform: Arc<P>, locks: Arc<NameLocks>, options: Options) -> Self {
        Self {
            platform,
            locks,
            options,
        }
    }

    /// Deploy `image` as `desired` and wait for the rollout to finish.
    ///
    /// Only one invocation per app name runs at a time; others wait for the lock.
    pub async fn deploy<S, F>(
        &self,
        desired: &DesiredSpec,
        image: &ImageRef,
        status: &dyn StatusSink,
        sleep_fn: S,
        cancel: &CancellationToken,
    ) -> Result<DeploymentOutcome, DeployError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        if desired.name.is_empty() {
            return Err(DeployError::ConfigError("app name must not be empty".to_string()));
        }
        self.options.fsm_settings.validate()?;

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DeployError::Cancelled),
            guard = self.locks.acquire(&desired.name) => guard,
        };

        status.update("Deploying application");
        info!("Deploying {}:{} as {}", image.image, image.tag, desired.name);

        let result = self.run(desired, image, status, sleep_fn, cancel).await;
        match &result {
            Ok(DeploymentOutcome::Success(app)) => {
                status.step_ok(&format!(
                    "Created App Platform deployment {} for {}",
                    app.active_deployment_id.as_deref().unwrap_or_default(),
                    desired.name
                ));
                if let Some(url) = &app.live_url {
                    status.step_ok(&format!("DigitalOcean App Platform URL: {}", url));
                }
            }
            Ok(outcome) => error!("Deploy of {} did not succeed: {:?}", desired.name, outcome),
            Err(e) => error!("Deploy of {} aborted: {}", desired.name, e),
        }

        result
    }

    async fn run<S, F>(
        &self,
        desired: &DesiredSpec,
        image: &ImageRef,
        status: &dyn StatusSink,
        sleep_fn: S,
        cancel: &CancellationToken,
    ) -> Result<DeploymentOutcome, DeployError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        let platform = self.platform.as_ref();

        let existing_id = find_existing_app(
            platform,
            &desired.name,
            &self.options.locator,
            status,
            cancel,
        )
        .await?;

        let location = resolve_image(image);
        let spec = build_app_spec(desired, &location);

        let app = create_or_update(platform, existing_id.as_deref(), spec, status, cancel).await?;

        status.update("Waiting for deployment to finish");
        wait_for_deployment(
            platform,
            &app.id,
            &self.options.fsm_settings,
            status,
            sleep_fn,
            cancel,
        )
        .await
    }
}
