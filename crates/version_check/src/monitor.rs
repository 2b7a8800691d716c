//! Periodic client update checks

use std::{sync::Arc, time::Duration};

use error_stack::Result;
use futures::FutureExt;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    Alert, AlertHandle, AlertService, PageReloader, QuitWatcher, UpdateService,
    VersionMonitorConfig, VersionMonitorError, update::apply_update,
};

const MESSAGE_CHANNEL_SIZE: usize = 16;

const MIN_UPDATE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct VersionMonitorQuitHandle {
    task: JoinHandle<()>,
    // Make sure Receiver works until the manager quits.
    _sender: mpsc::Sender<VersionMonitorMessage>,
}

impl VersionMonitorQuitHandle {
    pub async fn wait_quit(self) {
        match self.task.await {
            Ok(()) => (),
            Err(e) => {
                warn!("Version monitor quit failed. Error: {:?}", e);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMonitorMessage {
    CheckForUpdates,
}

#[derive(Debug, Clone)]
pub struct VersionMonitorHandle {
    sender: mpsc::Sender<VersionMonitorMessage>,
}

impl VersionMonitorHandle {
    /// Request an update check without waiting.
    pub fn request_update_check(&self) -> Result<(), VersionMonitorError> {
        self.sender
            .try_send(VersionMonitorMessage::CheckForUpdates)
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => VersionMonitorError::CheckAlreadyPending,
                mpsc::error::TrySendError::Closed(_) => VersionMonitorError::BrokenChannel,
            })?;
        Ok(())
    }
}

pub struct VersionMonitorInternalState {
    sender: mpsc::Sender<VersionMonitorMessage>,
    pub(crate) receiver: mpsc::Receiver<VersionMonitorMessage>,
}

/// External capabilities the monitor uses.
#[derive(Clone)]
pub struct VersionMonitorDeps {
    /// True when the application is stable.
    pub readiness: watch::Receiver<bool>,
    pub update_service: Arc<dyn UpdateService>,
    pub reloader: Arc<dyn PageReloader>,
    pub alerts: Arc<dyn AlertService>,
}

pub struct VersionMonitor {
    receiver: mpsc::Receiver<VersionMonitorMessage>,
    deps: VersionMonitorDeps,
    config: VersionMonitorConfig,
    /// Set when any check in this session has found an update.
    update_observed: bool,
    displayed_alert: Option<Box<dyn AlertHandle>>,
}

impl VersionMonitor {
    pub fn new_channel() -> (VersionMonitorHandle, VersionMonitorInternalState) {
        let (sender, receiver) = mpsc::channel(MESSAGE_CHANNEL_SIZE);
        let handle = VersionMonitorHandle {
            sender: sender.clone(),
        };
        let state = VersionMonitorInternalState { sender, receiver };
        (handle, state)
    }

    pub fn new_manager(
        internal_state: VersionMonitorInternalState,
        deps: VersionMonitorDeps,
        config: VersionMonitorConfig,
        quit_notification: QuitWatcher,
    ) -> VersionMonitorQuitHandle {
        let quit_handle_sender = internal_state.sender.clone();
        let manager = Self {
            receiver: internal_state.receiver,
            deps,
            config,
            update_observed: false,
            displayed_alert: None,
        };

        let task = tokio::spawn(manager.run(quit_notification));

        VersionMonitorQuitHandle {
            task,
            _sender: quit_handle_sender,
        }
    }

    pub async fn run(mut self, mut quit_notification: QuitWatcher) {
        let readiness = wait_until_stable(
            self.deps.readiness.clone(),
            self.config.readiness_timeout,
        );
        tokio::pin!(readiness);
        let mut timer: Option<Interval> = None;

        loop {
            tokio::select! {
                _ = &mut readiness, if timer.is_none() => {
                    // The first tick completes immediately.
                    let period = self.config.update_interval.max(MIN_UPDATE_INTERVAL);
                    let mut interval = tokio::time::interval(period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    timer = Some(interval);
                }
                _ = next_tick(&mut timer) => {
                    self.check_for_updates().await;
                }
                message = self.receiver.recv() => {
                    match message {
                        Some(VersionMonitorMessage::CheckForUpdates) => {
                            self.check_for_updates().await;
                        }
                        None => {
                            warn!("Version monitor channel closed");
                            return;
                        }
                    }
                }
                _ = quit_notification.recv() => {
                    return;
                }
            }
        }
    }

    async fn check_for_updates(&mut self) {
        match self.deps.update_service.check_for_update().await {
            Ok(available) => {
                if available && !self.update_observed {
                    info!("New client version is available");
                    self.update_observed = true;
                }
                if self.update_observed {
                    self.show_outdated_alert();
                }
            }
            Err(e) => {
                warn!("Update check failed. Error: {:?}", e);
            }
        }
    }

    fn show_outdated_alert(&mut self) {
        if let Some(previous) = self.displayed_alert.take() {
            previous.close();
        }

        let update_service = self.deps.update_service.clone();
        let reloader = self.deps.reloader.clone();
        let alert = Alert::outdated_client(Arc::new(move || {
            let update_service = update_service.clone();
            let reloader = reloader.clone();
            async move { apply_update(update_service.as_ref(), reloader.as_ref()).await }.boxed()
        }));

        self.displayed_alert = Some(self.deps.alerts.add_alert(alert));
    }
}

/// Completes when the readiness value is true, when the readiness
/// sender is dropped or when the timeout elapses.
async fn wait_until_stable(mut readiness: watch::Receiver<bool>, timeout: Duration) {
    match tokio::time::timeout(timeout, readiness.wait_for(|stable| *stable)).await {
        Ok(Ok(_)) => debug!("Application is stable"),
        Ok(Err(_)) => debug!("Readiness channel closed, starting update checks"),
        Err(_) => debug!("Application did not become stable, starting update checks"),
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
