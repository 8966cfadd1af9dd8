//! Release and teardown

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::DeployError;
use crate::models::deployment::{Deployment, Release};
use crate::platform::{cancellable, PlatformApi};
use crate::status::StatusSink;

/// Register a successful deployment as a release. No remote call is made.
pub fn release(deployment: &Deployment) -> Release {
    debug!("Registering release for app: {}", deployment.app_id);
    Release {
        app_id: deployment.app_id.clone(),
        url: deployment.live_url.clone(),
    }
}

/// Delete the released app with a single request.
///
/// The provider's error is returned as is; there is no existence check or retry.
pub async fn destroy<P>(
    platform: &P,
    release: &Release,
    status: &dyn StatusSink,
    cancel: &CancellationToken,
) -> Result<(), DeployError>
where
    P: PlatformApi + ?Sized,
{
    status.update("Destroying application");
    info!("Destroying application: {}", release.app_id);
    cancellable(cancel, platform.delete_app(&release.app_id)).await
}

/// Destroying a deployment leaves the app running; only a release owns teardown.
pub fn destroy_deployment(deployment: &Deployment) -> Result<(), DeployError> {
    debug!(
        "Nothing to destroy for deployment {} of app {}",
        deployment.active_deployment_id, deployment.app_id
    );
    Ok(())
}
