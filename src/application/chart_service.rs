// Chart controller - refresh sequencing, cancellation and display state
use crate::application::credential_provider::{CredentialProvider, Session};
use crate::application::error::DashboardError;
use crate::application::readings_repository::{FetchWindow, ReadingsRepository};
use crate::domain::bounds::{AxisBounds, AxisScale, compute_bounds};
use crate::domain::reading::{PlotPoint, RawReading};
use crate::domain::series::{NormalizedSeries, normalize};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// One fully normalized chart, replaced as a whole on every applied refresh.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub sequence: u64,
    pub window_days: u32,
    pub points: Vec<PlotPoint>,
    pub bounds: Option<AxisBounds>,
    pub scale: Option<AxisScale>,
    pub retained: usize,
    pub dropped: usize,
}

impl ChartView {
    fn new(sequence: u64, window: FetchWindow, series: NormalizedSeries) -> Self {
        let bounds = compute_bounds(&series.points);
        Self {
            sequence,
            window_days: window.as_days(),
            bounds,
            scale: bounds.as_ref().map(AxisScale::from_bounds),
            retained: series.retained,
            dropped: series.dropped,
            points: series.points,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Fetch,
    Auth,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayedError {
    pub kind: ErrorKind,
    pub message: String,
    pub sequence: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayState {
    /// Sequence number of the last response that changed this state.
    pub sequence: u64,
    pub chart: Option<ChartView>,
    pub error: Option<DisplayedError>,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Applied { sequence: u64, retained: usize, dropped: usize },
    Failed { sequence: u64, error: DashboardError },
    /// A newer response was already displayed.
    Stale { sequence: u64, displayed: u64 },
    /// The controller was disposed before the response arrived.
    Cancelled { sequence: u64 },
}

pub struct ChartController {
    credentials: Arc<dyn CredentialProvider>,
    repository: Arc<dyn ReadingsRepository>,
    window: FetchWindow,
    next_sequence: AtomicU64,
    state: Mutex<DisplayState>,
    disposed: watch::Sender<bool>,
}

impl ChartController {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        repository: Arc<dyn ReadingsRepository>,
        window: FetchWindow,
    ) -> Self {
        let (disposed, _) = watch::channel(false);
        Self {
            credentials,
            repository,
            window,
            next_sequence: AtomicU64::new(0),
            state: Mutex::new(DisplayState::default()),
            disposed,
        }
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock_state().clone()
    }

    /// Fetch, normalize and display one batch of readings.
    ///
    /// Each call takes the next sequence number. A response older than what is
    /// already displayed is discarded, and a failure leaves the previous chart
    /// in place next to the error.
    pub async fn refresh(&self, session: &Session) -> RefreshOutcome {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let disposed = self.disposed.subscribe();
        if *disposed.borrow() {
            return RefreshOutcome::Cancelled { sequence };
        }

        tracing::debug!(sequence, user = session.username(), "Starting chart refresh");

        let result = tokio::select! {
            result = self.fetch(session) => result,
            _ = wait_for_disposal(disposed) => {
                tracing::debug!(sequence, "Refresh abandoned after dispose");
                return RefreshOutcome::Cancelled { sequence };
            }
        };

        self.apply(sequence, result)
    }

    /// Abandon pending refreshes. No response changes the display state after this.
    pub fn dispose(&self) {
        let _state = self.lock_state();
        self.disposed.send_replace(true);
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        *self.disposed.borrow()
    }

    async fn fetch(&self, session: &Session) -> Result<Vec<RawReading>, DashboardError> {
        let token = self.credentials.token(session)?;
        let readings = self.repository.fetch_readings(&token, self.window).await?;
        Ok(readings)
    }

    fn apply(
        &self,
        sequence: u64,
        result: Result<Vec<RawReading>, DashboardError>,
    ) -> RefreshOutcome {
        let view = result
            .map(|readings| ChartView::new(sequence, self.window, normalize(&readings)));

        let mut state = self.lock_state();
        if *self.disposed.borrow() {
            return RefreshOutcome::Cancelled { sequence };
        }
        if sequence < state.sequence {
            tracing::debug!(sequence, displayed = state.sequence, "Discarding stale refresh");
            return RefreshOutcome::Stale {
                sequence,
                displayed: state.sequence,
            };
        }
        state.sequence = sequence;

        match view {
            Ok(view) => {
                let (retained, dropped) = (view.retained, view.dropped);
                tracing::info!(sequence, retained, dropped, "Chart refreshed");
                state.chart = Some(view);
                state.error = None;
                RefreshOutcome::Applied {
                    sequence,
                    retained,
                    dropped,
                }
            }
            Err(error) => {
                tracing::warn!(sequence, error = %error, "Chart refresh failed");
                let kind = if error.is_auth() {
                    ErrorKind::Auth
                } else {
                    ErrorKind::Fetch
                };
                state.error = Some(DisplayedError {
                    kind,
                    message: error.to_string(),
                    sequence,
                });
                RefreshOutcome::Failed { sequence, error }
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn wait_for_disposal(mut disposed: watch::Receiver<bool>) {
    while !*disposed.borrow_and_update() {
        if disposed.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
