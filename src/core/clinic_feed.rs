use crate::core::clinic_filter::filter_clinics;
use crate::core::lifetime::TeardownSignal;
use crate::domain::model::{ClinicRecord, PlacesResponse};
use crate::domain::ports::{PlacesProvider, PlacesQuery};
use crate::utils::error::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 背景抓取的狀態，只會從 `Pending` 轉換一次
#[derive(Debug, Clone)]
pub enum FeedState {
    Pending,
    Ready(Arc<PlacesResponse>),
    Failed(Arc<FetchError>),
}

impl FeedState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FeedState::Pending)
    }
}

#[derive(Debug, Clone)]
pub enum FeedOutcome {
    Ready(Arc<PlacesResponse>),
    Failed(Arc<FetchError>),
    /// 畫面在資料到達前就被拆除
    Cancelled,
}

/// `tokio::time::interval` 不接受零長度
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// session 開始時抓一次 places 資料，結果透過 watch channel 交給畫面
pub struct ClinicFeed {
    state: watch::Receiver<FeedState>,
    task: JoinHandle<()>,
    poll_interval: Duration,
}

impl ClinicFeed {
    pub fn spawn(
        provider: Arc<dyn PlacesProvider>,
        query: PlacesQuery,
        poll_interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(FeedState::Pending);

        let task = tokio::spawn(async move {
            let state = match provider.fetch_places(&query).await {
                Ok(response) => {
                    tracing::info!(
                        "✅ Places data loaded in background ({} features)",
                        response.features.len()
                    );
                    FeedState::Ready(Arc::new(response))
                }
                Err(e) => {
                    tracing::warn!("❌ Failed to load places in background: {}", e);
                    FeedState::Failed(Arc::new(e))
                }
            };
            tx.send_replace(state);
        });

        Self {
            state: rx,
            task,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        !self.state.borrow().is_pending()
    }

    /// 等待結果或畫面拆除，先發生者為準
    pub async fn wait(&self, teardown: &mut TeardownSignal) -> FeedOutcome {
        wait_for_state(self.state.clone(), self.poll_interval, teardown).await
    }

    /// Doctors 畫面使用：失敗只記 log，回傳空清單
    pub async fn load_clinics(&self, teardown: &mut TeardownSignal) -> Vec<ClinicRecord> {
        clinics_from(self.wait(teardown).await)
    }

    /// 不借用 feed 的載入器，可以丟給 `tokio::spawn`，等待期間仍能切換畫面
    pub fn loader(&self, teardown: TeardownSignal) -> ClinicLoader {
        ClinicLoader {
            state: self.state.clone(),
            poll_interval: self.poll_interval,
            teardown,
        }
    }
}

pub struct ClinicLoader {
    state: watch::Receiver<FeedState>,
    poll_interval: Duration,
    teardown: TeardownSignal,
}

impl ClinicLoader {
    pub async fn wait(mut self) -> FeedOutcome {
        wait_for_state(self.state, self.poll_interval, &mut self.teardown).await
    }

    pub async fn load(self) -> Vec<ClinicRecord> {
        clinics_from(self.wait().await)
    }
}

async fn wait_for_state(
    mut rx: watch::Receiver<FeedState>,
    poll_interval: Duration,
    teardown: &mut TeardownSignal,
) -> FeedOutcome {
    let mut ticker = tokio::time::interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.tick().await;

    loop {
        tokio::select! {
            settled = settled_state(&mut rx) => {
                return match settled {
                    Some(FeedState::Ready(response)) => FeedOutcome::Ready(response),
                    Some(FeedState::Failed(err)) => FeedOutcome::Failed(err),
                    // 背景 task 沒送出結果就結束了
                    Some(FeedState::Pending) | None => FeedOutcome::Cancelled,
                };
            }
            _ = teardown.torn_down() => {
                tracing::debug!("Clinic screen torn down before places data arrived");
                return FeedOutcome::Cancelled;
            }
            _ = ticker.tick() => {
                tracing::info!("Waiting for places data...");
            }
        }
    }
}

/// 複製出結果，不把 `watch::Ref` 留在 future 裡
async fn settled_state(rx: &mut watch::Receiver<FeedState>) -> Option<FeedState> {
    let settled = rx.wait_for(|state| !state.is_pending()).await.ok()?;
    Some(settled.clone())
}

fn clinics_from(outcome: FeedOutcome) -> Vec<ClinicRecord> {
    match outcome {
        FeedOutcome::Ready(response) => {
            let clinics = filter_clinics(&response);
            tracing::info!("🩺 Showing {} clinics", clinics.len());
            clinics
        }
        FeedOutcome::Failed(err) => {
            tracing::warn!("Clinic list unavailable: {}", err);
            Vec::new()
        }
        FeedOutcome::Cancelled => Vec::new(),
    }
}

impl Drop for ClinicFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifetime::ScreenLifetime;
    use crate::domain::model::LatLon;
    use async_trait::async_trait;
    use tokio::sync::{oneshot, Mutex};
    use tokio_test::assert_pending;

    /// 測試控制何時回傳資料
    struct GatedProvider {
        gate: Mutex<Option<oneshot::Receiver<PlacesResponse>>>,
    }

    #[async_trait]
    impl PlacesProvider for GatedProvider {
        async fn fetch_places(&self, _query: &PlacesQuery) -> Result<PlacesResponse, FetchError> {
            let gate = self.gate.lock().await.take();
            match gate {
                Some(rx) => Ok(rx.await.unwrap_or_default()),
                None => Ok(PlacesResponse::default()),
            }
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl PlacesProvider for FailingProvider {
        async fn fetch_places(&self, _query: &PlacesQuery) -> Result<PlacesResponse, FetchError> {
            Err(FetchError::Status {
                status: 503,
                body: String::new(),
            })
        }
    }

    fn query() -> PlacesQuery {
        PlacesQuery {
            center: LatLon::new(28.5355, 77.391),
            radius_meters: 50_000,
            category: "healthcare".to_string(),
            limit: 100,
        }
    }

    fn gated() -> (Arc<GatedProvider>, oneshot::Sender<PlacesResponse>) {
        let (tx, rx) = oneshot::channel();
        let provider = Arc::new(GatedProvider {
            gate: Mutex::new(Some(rx)),
        });
        (provider, tx)
    }

    fn hospital_response() -> PlacesResponse {
        serde_json::from_value(serde_json::json!({
            "features": [
                {"properties": {"name": "Fortis Hospital"}, "geometry": {"coordinates": [77.33, 28.61]}},
                {"properties": {"name": "Cafe"}, "geometry": {"coordinates": [77.30, 28.60]}}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_wait_is_pending_until_data_arrives() {
        let (provider, gate) = gated();
        let feed = ClinicFeed::spawn(provider, query(), Duration::from_millis(20));
        let lifetime = ScreenLifetime::new();
        let mut signal = lifetime.signal();

        {
            let mut waiting = tokio_test::task::spawn(feed.wait(&mut signal));
            assert_pending!(waiting.poll());
        }
        assert!(!feed.is_ready());

        gate.send(hospital_response()).unwrap();
        let clinics = feed.load_clinics(&mut signal).await;

        assert!(feed.is_ready());
        assert_eq!(clinics.len(), 1);
        assert_eq!(clinics[0].display_name, "Fortis Hospital");
    }

    #[tokio::test]
    async fn test_teardown_cancels_wait() {
        let (provider, _gate) = gated();
        let feed = ClinicFeed::spawn(provider, query(), Duration::from_millis(20));
        let lifetime = ScreenLifetime::new();
        let mut signal = lifetime.signal();

        let teardown = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            lifetime.tear_down();
        };
        let (outcome, _) = tokio::join!(feed.wait(&mut signal), teardown);

        assert!(matches!(outcome, FeedOutcome::Cancelled));
        assert!(feed.state().is_pending());
    }

    #[tokio::test]
    async fn test_failure_yields_empty_clinic_list() {
        let feed = ClinicFeed::spawn(Arc::new(FailingProvider), query(), Duration::from_millis(20));
        let lifetime = ScreenLifetime::new();
        let mut signal = lifetime.signal();

        assert!(feed.load_clinics(&mut signal).await.is_empty());
        assert!(matches!(feed.state(), FeedState::Failed(_)));
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_clamped() {
        let feed = ClinicFeed::spawn(Arc::new(FailingProvider), query(), Duration::ZERO);
        let lifetime = ScreenLifetime::new();

        assert!(feed.load_clinics(&mut lifetime.signal()).await.is_empty());
    }

    #[tokio::test]
    async fn test_spawned_loader_outlives_borrow_and_cancels() {
        let (provider, _gate) = gated();
        let feed = ClinicFeed::spawn(provider, query(), Duration::from_millis(20));
        let lifetime = ScreenLifetime::new();

        let handle = tokio::spawn(feed.loader(lifetime.signal()).load());
        tokio::time::sleep(Duration::from_millis(30)).await;
        lifetime.tear_down();

        let clinics = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("teardown should end the load")
            .unwrap();
        assert!(clinics.is_empty());
        assert!(!feed.is_ready());
    }

    #[tokio::test]
    async fn test_result_is_shared_between_screens() {
        let (provider, gate) = gated();
        gate.send(hospital_response()).unwrap();
        let feed = ClinicFeed::spawn(provider, query(), Duration::from_millis(20));

        let first = ScreenLifetime::new();
        let second = ScreenLifetime::new();
        let a = feed.load_clinics(&mut first.signal()).await;
        let b = feed.load_clinics(&mut second.signal()).await;

        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }
}
