//! Credential validation

use openapi_client::Account;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::DeployError;
use crate::platform::{cancellable, PlatformApi};
use crate::status::StatusSink;

/// Where to create an access token
pub const TOKEN_URL: &str = "https://cloud.digitalocean.com/account/api/tokens/new";

/// Confirm the credential works by reading the account it belongs to
pub async fn validate_auth<P>(
    platform: &P,
    status: &dyn StatusSink,
    cancel: &CancellationToken,
) -> Result<Account, DeployError>
where
    P: PlatformApi + ?Sized,
{
    status.update("Validating authentication");

    match cancellable(cancel, platform.get_account()).await {
        Ok(account) => {
            status.step_ok(&format!("Authenticated as {} ({})", account.email, account.uuid));
            Ok(account)
        }
        Err(DeployError::Cancelled) => Err(DeployError::Cancelled),
        Err(e) => {
            debug!("Account lookup failed: {}", e);
            Err(DeployError::AuthError("Unable to authenticate".to_string()))
        }
    }
}

/// Hint shown when no usable credential is configured
pub fn auth_help() -> String {
    format!("Configure an access token generated from: {}", TOKEN_URL)
}
