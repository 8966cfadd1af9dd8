//! Create-or-update dispatch

use openapi_client::{AppCreateRequest, AppSpec, AppUpdateRequest};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::errors::DeployError;
use crate::models::deployment::RemoteApplication;
use crate::platform::{call, PlatformApi};
use crate::status::StatusSink;

/// Submit `spec`: update `existing_id` when present, otherwise create a new app.
///
/// The returned app may not have started rolling out yet.
pub async fn create_or_update<P>(
    platform: &P,
    existing_id: Option<&str>,
    spec: AppSpec,
    status: &dyn StatusSink,
    cancel: &CancellationToken,
) -> Result<RemoteApplication, DeployError>
where
    P: PlatformApi + ?Sized,
{
    let name = spec.name.clone();

    let app = match existing_id {
        Some(app_id) => {
            status.update(&format!(
                "Creating new deployment for existing application: {} ({})",
                name, app_id
            ));
            let request = AppUpdateRequest { spec };
            call(cancel, "update app", app_id, platform.update_app(app_id, &request)).await?
        }
        None => {
            status.update(&format!("Creating new application: {}", name));
            let request = AppCreateRequest { spec };
            call(cancel, "create app", &name, platform.create_app(&request)).await?
        }
    };

    info!("Submitted spec for {} (app {})", name, app.id);
    Ok(app.into())
}
