use crate::api::models::{AlertRecord, MetricSample, SummarySnapshot, ThresholdConfig};

use super::paging::PageCursor;

/// Lifecycle of the displayed dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session; nothing to show but the login surface.
    Unauthenticated,
    /// First fetch cycle in flight, no data yet. The UI shows a loading
    /// placeholder.
    Loading,
    /// A refresh cycle is in flight while a previous snapshot is still
    /// displayed. The UI keeps showing the old data, not a spinner.
    Refreshing,
    /// The snapshot reflects the last completed cycle.
    Ready,
}

/// The canonical in-memory snapshot owned by the reconciler.
///
/// Collections are replaced wholesale by a refresh cycle, never merged.
/// Everything here is discarded on logout.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: Phase,
    pub summary: Option<SummarySnapshot>,
    /// Newest-first, as returned by the backend.
    pub alerts: Vec<AlertRecord>,
    /// Newest-first, as returned by the backend.
    pub metrics: Vec<MetricSample>,
    /// Fetched independently of the poll cycle; holds local edits until
    /// an explicit save.
    pub thresholds: ThresholdConfig,
    pub metrics_cursor: PageCursor,
    pub alerts_cursor: PageCursor,
}

impl DashboardState {
    pub fn new(metrics_per_page: usize, alerts_per_page: usize) -> Self {
        Self {
            phase: Phase::Unauthenticated,
            summary: None,
            alerts: Vec::new(),
            metrics: Vec::new(),
            thresholds: ThresholdConfig::default(),
            metrics_cursor: PageCursor::new(metrics_per_page),
            alerts_cursor: PageCursor::new(alerts_per_page),
        }
    }

    pub fn has_data(&self) -> bool {
        self.summary.is_some() || !self.alerts.is_empty() || !self.metrics.is_empty()
    }

    /// Drops every snapshot and both cursors, back to the unauthenticated
    /// baseline. Page sizes survive; they are configuration, not data.
    pub fn discard(&mut self) {
        self.phase = Phase::Unauthenticated;
        self.summary = None;
        self.alerts.clear();
        self.metrics.clear();
        self.thresholds = ThresholdConfig::default();
        self.metrics_cursor.reset();
        self.alerts_cursor.reset();
    }
}
