//! Version monitor collaborators for a command line client

use api_client::{ApiClient, ApiRequest, server_date::SERVER_TIME_PATH};
use async_trait::async_trait;
use error_stack::{Result, ResultExt, report};
use tracing::{debug, info, warn};
use version_check::{
    ARTEMIS_VERSION_HEADER, Alert, AlertHandle, AlertService, PageReloader, UpdateError,
    UpdateService, alert::OUTDATED_ALERT_MESSAGE,
};

/// Reports an update when the server responds with a version header
/// different from the client version.
///
/// The API client must not check versions itself.
pub struct ServerVersionCheck {
    api: ApiClient,
    client_version: String,
}

impl ServerVersionCheck {
    pub fn new(api: ApiClient, client_version: impl Into<String>) -> Self {
        Self {
            api,
            client_version: client_version.into(),
        }
    }
}

#[async_trait]
impl UpdateService for ServerVersionCheck {
    async fn check_for_update(&self) -> Result<bool, UpdateError> {
        let response = self
            .api
            .execute(ApiRequest::get(SERVER_TIME_PATH))
            .await
            .change_context(UpdateError::CheckFailed)?;
        let update_available = match response.header(ARTEMIS_VERSION_HEADER) {
            Some(server_version) => server_version != self.client_version.as_bytes(),
            None => false,
        };
        debug!("Update check done, update available: {}", update_available);
        Ok(update_available)
    }

    async fn activate_update(&self) -> Result<(), UpdateError> {
        Err(report!(UpdateError::ActivationFailed))
            .attach_printable("Client binary must be updated manually")
    }
}

/// Shows alerts as log messages.
pub struct LogAlertService;

impl AlertService for LogAlertService {
    fn add_alert(&self, alert: Alert) -> Box<dyn AlertHandle> {
        let text = alert_text(&alert.message);
        warn!("{}", text);
        Box::new(LogAlertHandle { text })
    }
}

struct LogAlertHandle {
    text: &'static str,
}

impl AlertHandle for LogAlertHandle {
    fn close(&self) {
        debug!("Alert closed: {}", self.text);
    }
}

fn alert_text(message_key: &str) -> &'static str {
    match message_key {
        OUTDATED_ALERT_MESSAGE => {
            "The server runs a different Artemis version. Restart the client after updating it."
        }
        _ => "Unknown alert",
    }
}

pub struct LogReloader;

impl PageReloader for LogReloader {
    fn reload(&self) {
        info!("Restart the client to use the new version");
    }
}
