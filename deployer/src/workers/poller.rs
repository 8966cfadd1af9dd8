//! Rollout polling worker

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::deploy::fsm::{DeploymentFsm, FsmSettings, PollEvent, PollState};
use crate::errors::DeployError;
use crate::models::deployment::{DeploymentOutcome, DeploymentProgress, RemoteApplication};
use crate::platform::{call, PlatformApi};
use crate::status::StatusSink;

/// Poll `app_id` on a fixed interval until its newest deployment is terminal.
///
/// A zero poll interval is rejected up front. Any failed fetch aborts the wait.
/// Cancellation stops ticking immediately and returns [`DeployError::Cancelled`];
/// reaching the deadline is a normal [`DeploymentOutcome::TimedOut`].
pub async fn wait_for_deployment<P, S, F>(
    platform: &P,
    app_id: &str,
    settings: &FsmSettings,
    status: &dyn StatusSink,
    sleep_fn: S,
    cancel: &CancellationToken,
) -> Result<DeploymentOutcome, DeployError>
where
    P: PlatformApi + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    settings.validate()?;

    info!("Waiting for deployment of app {}", app_id);
    let mut fsm = DeploymentFsm::new(app_id, settings.clone());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Stopped waiting for app {} deployment", app_id);
                return Err(DeployError::Cancelled);
            }
            _ = sleep_fn(settings.poll_interval) => {}
        }

        fsm.process(PollEvent::Tick).map_err(DeployError::Internal)?;

        match fsm.state().clone() {
            PollState::AwaitingDeploymentId => {
                let app = call(cancel, "get app", app_id, platform.get_app(app_id)).await?;
                let app = RemoteApplication::from(app);
                if let Some(deployment_id) = &app.current_deployment_id {
                    debug!("App {} is rolling out deployment {}", app_id, deployment_id);
                }
                fsm.process(PollEvent::AppObserved(app))
                    .map_err(DeployError::Internal)?;
            }
            PollState::Polling { deployment_id } => {
                let deployment = call(
                    cancel,
                    "get deployment",
                    app_id,
                    platform.get_deployment(app_id, &deployment_id),
                )
                .await?;
                let progress = DeploymentProgress::from(&deployment);

                fsm.process(PollEvent::ProgressObserved(progress.clone()))
                    .map_err(DeployError::Internal)?;

                match fsm.state() {
                    PollState::Converging { .. } => {
                        let app = call(cancel, "get app", app_id, platform.get_app(app_id)).await?;
                        fsm.process(PollEvent::Converged(app.into()))
                            .map_err(DeployError::Internal)?;
                    }
                    PollState::Polling { .. } => {
                        status.update(&fsm.progress_line(&deployment_id, &progress));
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        if let Some(outcome) = fsm.outcome() {
            info!(
                "Deployment of app {} finished after {} ticks: {:?}",
                app_id,
                fsm.ticks(),
                outcome
            );
            return Ok(outcome);
        }
    }
}
