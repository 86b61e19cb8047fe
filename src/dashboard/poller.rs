use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::api::DashboardApi;

use super::reconciler::Reconciler;

/// Drives the reconciler: one immediate refresh cycle when the session
/// starts (followed by the one-shot threshold fetch), then a recurring
/// cycle on a fixed period until shutdown or logout.
///
/// Manual refresh requests arrive on `refresh_rx`. Any trigger (timer or
/// manual) that lands while a cycle is in flight is dropped by the
/// reconciler's cycle gate rather than queued, so at most one cycle is
/// ever running. An in-flight cycle is never cancelled on shutdown; its
/// late results are suppressed by the session generation check instead.
pub async fn poll_loop<A: DashboardApi>(
    reconciler: Arc<Reconciler<A>>,
    period: Duration,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(period_secs = period.as_secs(), "poll loop started");

    reconciler.refresh_cycle().await;
    reconciler.load_thresholds().await;

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // An interval's first tick fires immediately; the initial cycle above
    // already covered it.
    ticker.tick().await;

    loop {
        if !reconciler.session().is_authenticated() {
            info!("session ended, poll loop stopping");
            return;
        }

        tokio::select! {
            _ = ticker.tick() => {
                debug!("poll tick");
                reconciler.refresh_cycle().await;
            }
            request = refresh_rx.recv() => {
                match request {
                    Some(()) => {
                        debug!("manual refresh requested");
                        reconciler.refresh_cycle().await;
                    }
                    // Controller dropped the refresh handle; treat it
                    // like a teardown.
                    None => break,
                }
            }
            changed = shutdown_rx.changed() => {
                // A dropped sender counts as shutdown too.
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
    info!("poll loop stopping");
}
