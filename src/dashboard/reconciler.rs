use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::api::models::UpdateThresholdsRequest;
use crate::api::{ApiError, DashboardApi};
use crate::session::SessionStore;

use super::state::{DashboardState, Phase};

/// Notifications for the rendering surface (popup widget, status line).
/// The reconciler never talks to a widget directly; it emits these and
/// the controller decides how to present them.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A refresh cycle applied a complete new snapshot.
    RefreshCompleted,
    /// A refresh cycle hit a transient error; the previous snapshot is
    /// still displayed.
    RefreshFailed { message: String },
    /// The backend rejected the session token; the session has been
    /// cleared and the login surface should be shown.
    SessionExpired,
    ThresholdsSaved,
    ThresholdsSaveFailed { message: String },
}

/// Raw threshold form values as entered by the user. Fields left `None`
/// (or blank) are not sent, so the backend keeps its current values.
#[derive(Debug, Clone, Default)]
pub struct ThresholdInput {
    pub cpu_threshold: Option<String>,
    pub mem_threshold: Option<String>,
}

/// Owns the canonical dashboard snapshot and drives every state
/// transition derived from fetch results.
///
/// One refresh cycle fetches summary, alerts, and metrics sequentially so
/// a session-expiry response on an early call prevents the later calls
/// from being issued at all. A cycle gate (`try_lock`) keeps at most one
/// cycle in flight; overlapping triggers are dropped, not queued.
pub struct Reconciler<A> {
    api: Arc<A>,
    session: SessionStore,
    state: RwLock<DashboardState>,
    events: mpsc::UnboundedSender<DashboardEvent>,
    cycle_gate: Mutex<()>,
}

impl<A: DashboardApi> Reconciler<A> {
    pub fn new(
        api: Arc<A>,
        session: SessionStore,
        events: mpsc::UnboundedSender<DashboardEvent>,
        metrics_per_page: usize,
        alerts_per_page: usize,
    ) -> Self {
        Self {
            api,
            session,
            state: RwLock::new(DashboardState::new(metrics_per_page, alerts_per_page)),
            events,
            cycle_gate: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// A copy of the current snapshot for rendering or projection.
    pub fn snapshot(&self) -> DashboardState {
        self.state.read().unwrap().clone()
    }

    /// Runs one refresh cycle: summary, then alerts, then metrics.
    ///
    /// Returns `true` when a cycle actually executed (even one that
    /// failed) and `false` when the trigger was a no-op: no session, or
    /// another cycle already in flight.
    pub async fn refresh_cycle(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        let Ok(_in_flight) = self.cycle_gate.try_lock() else {
            debug!("refresh already in flight, dropping trigger");
            return false;
        };
        let generation = self.session.generation();

        {
            let mut state = self.state.write().unwrap();
            state.phase = if state.has_data() {
                Phase::Refreshing
            } else {
                Phase::Loading
            };
        }

        let summary = match self.api.fetch_summary().await {
            Ok(summary) => summary,
            Err(err) => return self.abort_cycle(err, generation),
        };
        if self.stale(generation) {
            return true;
        }
        self.state.write().unwrap().summary = Some(summary);

        let alerts = match self.api.fetch_alerts().await {
            Ok(alerts) => alerts,
            Err(err) => return self.abort_cycle(err, generation),
        };
        if self.stale(generation) {
            return true;
        }
        {
            let mut state = self.state.write().unwrap();
            state.alerts = alerts;
            state.alerts_cursor.reset();
        }

        let metrics = match self.api.fetch_metrics().await {
            Ok(metrics) => metrics,
            Err(err) => return self.abort_cycle(err, generation),
        };
        if self.stale(generation) {
            return true;
        }
        {
            let mut state = self.state.write().unwrap();
            state.metrics = metrics;
            state.metrics_cursor.reset();
            state.phase = Phase::Ready;
        }

        self.emit(DashboardEvent::RefreshCompleted);
        true
    }

    /// Fetches thresholds outside the refresh cycle: once at session
    /// start, and again on demand. A failure here is logged but not
    /// surfaced; the form simply keeps its current values.
    pub async fn load_thresholds(&self) {
        if !self.session.is_authenticated() {
            return;
        }
        let generation = self.session.generation();
        match self.api.fetch_thresholds().await {
            Ok(thresholds) => {
                if self.stale(generation) {
                    return;
                }
                self.state.write().unwrap().thresholds = thresholds;
            }
            Err(err) => warn!(error = %err, "failed to load thresholds"),
        }
    }

    /// Persists the threshold form. Only the fields the user filled in are
    /// sent. On success the saved values are taken as authoritative and
    /// nothing is re-fetched. On failure the caller's unsaved edits stay
    /// untouched.
    pub async fn save_thresholds(&self, input: &ThresholdInput) {
        let request = match build_update_request(input) {
            Ok(request) => request,
            Err(err) => {
                self.emit(DashboardEvent::ThresholdsSaveFailed {
                    message: err.to_string(),
                });
                return;
            }
        };
        match self.api.save_thresholds(&request).await {
            Ok(_) => {
                let mut state = self.state.write().unwrap();
                if let Some(value) = request.cpu_threshold {
                    state.thresholds.cpu_threshold = Some(value);
                }
                if let Some(value) = request.mem_threshold {
                    state.thresholds.mem_threshold = Some(value);
                }
                drop(state);
                self.emit(DashboardEvent::ThresholdsSaved);
            }
            Err(err) => {
                warn!(error = %err, "failed to save thresholds");
                self.emit(DashboardEvent::ThresholdsSaveFailed {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Explicit logout: drop the session and every snapshot derived from
    /// it. In-flight results are suppressed by the generation check.
    pub fn logout(&self) {
        self.session.clear();
        self.state.write().unwrap().discard();
    }

    pub fn next_metrics_page(&self) {
        let mut state = self.state.write().unwrap();
        let len = state.metrics.len();
        state.metrics_cursor.next(len);
    }

    pub fn prev_metrics_page(&self) {
        self.state.write().unwrap().metrics_cursor.prev();
    }

    pub fn next_alerts_page(&self) {
        let mut state = self.state.write().unwrap();
        let len = state.alerts.len();
        state.alerts_cursor.next(len);
    }

    pub fn prev_alerts_page(&self) {
        self.state.write().unwrap().alerts_cursor.prev();
    }

    /// True when the session transitioned since the cycle recorded
    /// `generation`; results from before the transition must not touch
    /// the state of whatever came after.
    fn stale(&self, generation: u64) -> bool {
        if self.session.generation() != generation {
            debug!("session changed mid-cycle, discarding fetch results");
            return true;
        }
        false
    }

    fn abort_cycle(&self, err: ApiError, generation: u64) -> bool {
        if self.stale(generation) {
            return true;
        }
        if err.is_session_expired() {
            warn!("session rejected by backend, returning to login");
            self.session.clear();
            self.state.write().unwrap().discard();
            self.emit(DashboardEvent::SessionExpired);
        } else {
            warn!(error = %err, "refresh cycle failed, keeping last snapshot");
            self.state.write().unwrap().phase = Phase::Ready;
            self.emit(DashboardEvent::RefreshFailed {
                message: err.to_string(),
            });
        }
        true
    }

    fn emit(&self, event: DashboardEvent) {
        if self.events.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

fn build_update_request(input: &ThresholdInput) -> Result<UpdateThresholdsRequest, ApiError> {
    Ok(UpdateThresholdsRequest {
        cpu_threshold: parse_threshold("cpu_threshold", input.cpu_threshold.as_deref())?,
        mem_threshold: parse_threshold("mem_threshold", input.mem_threshold.as_deref())?,
    })
}

/// Blank input means "leave unchanged"; anything else must parse as a
/// finite number before a request is issued.
fn parse_threshold(field: &str, raw: Option<&str>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ApiError::Validation(format!("{field} must be a number, got {trimmed:?}")))?;
    if !value.is_finite() {
        return Err(ApiError::Validation(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(Some(value))
}
