#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

//! Detect outdated client and offer reload
//!
//! [VersionMonitor] polls [UpdateService] periodically and
//! [VersionCheckingTransport] requests extra checks when HTTP responses
//! report a different server version.

pub mod alert;
pub mod interceptor;
pub mod monitor;
pub mod update;

use std::time::Duration;

pub use alert::{Alert, AlertAction, AlertHandle, AlertService, AlertType};
pub use interceptor::VersionCheckingTransport;
pub use monitor::{
    VersionMonitor, VersionMonitorDeps, VersionMonitorHandle, VersionMonitorInternalState,
    VersionMonitorMessage, VersionMonitorQuitHandle,
};
pub use update::{PageReloader, UpdateError, UpdateService};

/// Response header which contains the server version.
pub const ARTEMIS_VERSION_HEADER: &str = "Content-Version";

/// Drop this when quit starts
pub type QuitHandle = tokio::sync::broadcast::Sender<()>;

/// Use resubscribe() for cloning.
pub type QuitWatcher = tokio::sync::broadcast::Receiver<()>;

#[derive(Debug, Clone)]
pub struct VersionMonitorConfig {
    /// Version embedded in the client build.
    pub client_version: String,
    /// Maximum wait for the application to become stable before the
    /// first update check.
    pub readiness_timeout: Duration,
    pub update_interval: Duration,
}

impl VersionMonitorConfig {
    pub const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_millis(30000);
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(60000);

    pub fn new(client_version: impl Into<String>) -> Self {
        Self {
            client_version: client_version.into(),
            readiness_timeout: Self::DEFAULT_READINESS_TIMEOUT,
            update_interval: Self::DEFAULT_UPDATE_INTERVAL,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VersionMonitorError {
    #[error("Broken channel")]
    BrokenChannel,

    #[error("Update check already pending")]
    CheckAlreadyPending,
}
