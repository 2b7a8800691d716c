//! Client update capabilities

use async_trait::async_trait;
use error_stack::Result;
use tracing::{info, warn};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UpdateError {
    #[error("Checking for update failed")]
    CheckFailed,

    #[error("Activating update failed")]
    ActivationFailed,
}

/// Access to the new client version if the server provides one.
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Returns true if a newer client version is available.
    async fn check_for_update(&self) -> Result<bool, UpdateError>;

    async fn activate_update(&self) -> Result<(), UpdateError>;
}

pub trait PageReloader: Send + Sync {
    fn reload(&self);
}

/// Activate the update and reload. The reload happens even if
/// the activation fails.
pub async fn apply_update(update_service: &dyn UpdateService, reloader: &dyn PageReloader) {
    match update_service.activate_update().await {
        Ok(()) => info!("Client update activated"),
        Err(e) => warn!("Client update activation failed, reloading anyway. Error: {:?}", e),
    }
    reloader.reload();
}
