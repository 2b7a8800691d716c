//! User notifications shown by the version monitor

use std::{fmt, sync::Arc, time::Duration};

use futures::future::BoxFuture;

pub const OUTDATED_ALERT_MESSAGE: &str = "artemisApp.outdatedAlert";
pub const OUTDATED_ALERT_ACTION_LABEL: &str = "artemisApp.outdatedAction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Info,
    Warning,
    Danger,
}

pub type AlertCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Clone)]
pub struct AlertAction {
    /// Translation key
    pub label: String,
    pub callback: AlertCallback,
}

impl AlertAction {
    pub async fn run(&self) {
        (self.callback)().await
    }
}

impl fmt::Debug for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub alert_type: AlertType,
    /// Translation key
    pub message: String,
    /// The alert stays visible until closed if this is `None`.
    pub timeout: Option<Duration>,
    pub action: Option<AlertAction>,
}

impl Alert {
    /// Non-expiring reload prompt.
    pub fn outdated_client(callback: AlertCallback) -> Self {
        Self {
            alert_type: AlertType::Info,
            message: OUTDATED_ALERT_MESSAGE.to_string(),
            timeout: None,
            action: Some(AlertAction {
                label: OUTDATED_ALERT_ACTION_LABEL.to_string(),
                callback,
            }),
        }
    }
}

/// Displays alerts to the user.
pub trait AlertService: Send + Sync {
    fn add_alert(&self, alert: Alert) -> Box<dyn AlertHandle>;
}

/// Handle to a displayed alert.
pub trait AlertHandle: Send {
    fn close(&self);
}
