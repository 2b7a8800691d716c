//! Estimate the difference between server and client clocks

use std::{collections::VecDeque, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use error_stack::{Result, ResultExt};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, warn};
use utils::time::parse_iso8601;

use crate::{ApiClient, ApiError, ApiRequest};

pub const SERVER_TIME_PATH: &str = "api/public/time";

/// Minimum time between two synchronizations.
const SYNC_INTERVAL: Duration = Duration::from_secs(60);

const MAX_OFFSET_SAMPLES: usize = 5;

/// Something which should refresh its knowledge of the server time
/// when the server has been contacted.
pub trait ServerTimeSync: Send + Sync {
    /// Must not block. Implementations run the actual work
    /// in the background.
    fn update_time(&self);
}

#[derive(Debug, Default)]
struct SyncState {
    last_sync: Option<Instant>,
    sync_in_progress: bool,
    /// Server time minus client time in milliseconds.
    offsets: VecDeque<i64>,
}

#[derive(Debug, Clone)]
pub struct ServerDateService {
    api: ApiClient,
    state: Arc<Mutex<SyncState>>,
}

impl ServerDateService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(SyncState::default())),
        }
    }

    /// Current time using the server clock if it is known.
    pub async fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.offset().await {
            Some(offset) => now + offset,
            None => now,
        }
    }

    /// Mean of the recent offset samples.
    pub async fn offset(&self) -> Option<TimeDelta> {
        let state = self.state.lock().await;
        if state.offsets.is_empty() {
            return None;
        }
        let sum: i64 = state.offsets.iter().sum();
        let samples = i64::try_from(state.offsets.len()).ok()?;
        Some(TimeDelta::milliseconds(sum / samples))
    }

    /// Fetch the server time unless the previous sync is recent.
    pub async fn sync_if_needed(&self) -> Result<(), ApiError> {
        {
            let mut state = self.state.lock().await;
            let recently_synced = state
                .last_sync
                .map(|time| time.elapsed() < SYNC_INTERVAL)
                .unwrap_or(false);
            if recently_synced || state.sync_in_progress {
                return Ok(());
            }
            state.sync_in_progress = true;
        }

        let result = self.fetch_offset().await;

        let mut state = self.state.lock().await;
        state.sync_in_progress = false;
        let offset = result?;
        state.last_sync = Some(Instant::now());
        if state.offsets.len() >= MAX_OFFSET_SAMPLES {
            state.offsets.pop_front();
        }
        state.offsets.push_back(offset.num_milliseconds());
        debug!("Server time offset sample: {} ms", offset.num_milliseconds());
        Ok(())
    }

    async fn fetch_offset(&self) -> Result<TimeDelta, ApiError> {
        let sent = Utc::now();
        let server_time: String = self.api.get_json(ApiRequest::get(SERVER_TIME_PATH)).await?;
        let received = Utc::now();
        let server_time = parse_iso8601(&server_time).change_context(ApiError::DeserializeResponse)?;
        let round_trip = received - sent;
        let client_time_at_server = sent + round_trip / 2;
        Ok(server_time - client_time_at_server)
    }
}

impl ServerTimeSync for ServerDateService {
    fn update_time(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Server time sync skipped, no async runtime");
            return;
        };
        let service = self.clone();
        runtime.spawn(async move {
            if let Err(e) = service.sync_if_needed().await {
                warn!("Server time sync failed. Error: {:?}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::client::tests::StaticTransport;

    fn service_with_server_time(body: &str) -> (ServerDateService, Arc<StaticTransport>) {
        let transport = StaticTransport::new(StatusCode::OK, body);
        let service = ServerDateService::new(ApiClient::new(transport.clone()));
        (service, transport)
    }

    #[tokio::test]
    async fn offset_is_unknown_before_sync() {
        let (service, _) = service_with_server_time("\"2022-04-14T10:35:12.332Z\"");
        assert_eq!(service.offset().await, None);
    }

    #[tokio::test]
    async fn server_in_the_past_gives_negative_offset() {
        let (service, transport) = service_with_server_time("\"2022-04-14T10:35:12.332Z\"");
        service.sync_if_needed().await.unwrap();
        let offset = service.offset().await.unwrap();
        assert!(offset < TimeDelta::zero());
        assert_eq!(transport.requests.lock().unwrap()[0].path, SERVER_TIME_PATH);
    }

    #[tokio::test(start_paused = true)]
    async fn recent_sync_is_not_repeated() {
        let (service, transport) = service_with_server_time("\"2022-04-14T10:35:12.332Z\"");
        service.sync_if_needed().await.unwrap();
        service.sync_if_needed().await.unwrap();
        assert_eq!(transport.requests.lock().unwrap().len(), 1);

        tokio::time::advance(SYNC_INTERVAL).await;
        service.sync_if_needed().await.unwrap();
        assert_eq!(transport.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_server_time_is_error() {
        let (service, _) = service_with_server_time("\"noon\"");
        let error = service.sync_if_needed().await.unwrap_err();
        assert_eq!(error.current_context(), &ApiError::DeserializeResponse);
        assert_eq!(service.offset().await, None);
    }
}
