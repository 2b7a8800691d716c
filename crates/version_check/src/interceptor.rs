//! Inspect API responses for server version changes

use std::sync::Arc;

use api_client::{ApiError, ApiRequest, ApiResponse, HttpTransport, ServerTimeSync};
use async_trait::async_trait;
use error_stack::Result;
use tracing::{debug, info};

use crate::{ARTEMIS_VERSION_HEADER, VersionMonitorError, VersionMonitorHandle};

/// Translation bundle URLs contain this.
const I18N_URL_PART: &str = "/i18n/";

/// Server time requests have this in the path.
const TIME_PATH_PART: &str = "time";

/// [HttpTransport] which requests an update check when the server
/// version differs from the client version and triggers server
/// time synchronization.
pub struct VersionCheckingTransport<T> {
    inner: T,
    client_version: String,
    monitor: VersionMonitorHandle,
    server_time: Option<Arc<dyn ServerTimeSync>>,
}

impl<T: HttpTransport> VersionCheckingTransport<T> {
    pub fn new(inner: T, client_version: impl Into<String>, monitor: VersionMonitorHandle) -> Self {
        Self {
            inner,
            client_version: client_version.into(),
            monitor,
            server_time: None,
        }
    }

    pub fn with_server_time(mut self, server_time: Arc<dyn ServerTimeSync>) -> Self {
        self.server_time = Some(server_time);
        self
    }

    fn inspect(&self, request_path: &str, response: &ApiResponse) {
        if self.is_version_mismatch(response) {
            info!("Server version differs from client version, checking for updates");
            match self.monitor.request_update_check() {
                Ok(()) => (),
                Err(e) if e.current_context() == &VersionMonitorError::CheckAlreadyPending => {
                    debug!("Update check already pending");
                }
                Err(e) => debug!("Update check request failed. Error: {:?}", e),
            }
        }

        if !request_path.contains(TIME_PATH_PART) {
            if let Some(server_time) = &self.server_time {
                server_time.update_time();
            }
        }
    }

    fn is_version_mismatch(&self, response: &ApiResponse) -> bool {
        if self.client_version.is_empty() || response.url.contains(I18N_URL_PART) {
            return false;
        }
        match response.header(ARTEMIS_VERSION_HEADER) {
            Some(server_version) => server_version != self.client_version.as_bytes(),
            None => false,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for VersionCheckingTransport<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request_path = request.path.clone();
        let response = self.inner.send(request).await?;
        if response.is_success() {
            self.inspect(&request_path, &response);
        }
        Ok(response)
    }
}
