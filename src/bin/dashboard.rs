use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use obsdash::api::{ApiGateway, DashboardApi, LoginRequest};
use obsdash::config::load_config;
use obsdash::dashboard::{paging, poll_loop, series, DashboardEvent, Reconciler};
use obsdash::local_store::{LocalStore, Theme};
use obsdash::session::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "dashboard", version, about = "Headless observability dashboard client")]
struct Cli {
    /// Path to the client configuration file.
    #[arg(long, default_value = "obsdash.toml")]
    config: String,
    /// Set and persist the theme preference (light or dark).
    #[arg(long)]
    theme: Option<Theme>,
}

fn init_logging() {
    // Filter based on RUST_LOG, defaulting to `info`.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn render_snapshot(reconciler: &Reconciler<ApiGateway>) {
    let snapshot = reconciler.snapshot();
    if let Some(summary) = &snapshot.summary {
        info!(
            total_alerts = summary.total_alerts,
            avg_cpu = summary.avg_cpu,
            avg_memory = summary.avg_memory,
            "summary"
        );
    }
    let metrics_page = paging::project(&snapshot.metrics, &snapshot.metrics_cursor);
    info!(
        page = metrics_page.page,
        pages = metrics_page.page_count,
        rows = metrics_page.items.len(),
        "metrics page"
    );
    let alerts_page = paging::project(&snapshot.alerts, &snapshot.alerts_cursor);
    info!(
        page = alerts_page.page,
        pages = alerts_page.page_count,
        rows = alerts_page.items.len(),
        "alerts page"
    );
    let trend = series::project_trend(&snapshot.metrics, series::TREND_WINDOW);
    info!(points = trend.labels.len(), "trend series refreshed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let store = LocalStore::new(config.state_path.clone());
    let mut local = store.load();
    if let Some(theme) = cli.theme {
        if theme != local.theme {
            local.theme = theme;
            store.save(&local)?;
        }
    }
    info!(theme = %local.theme, "using theme");

    let session = SessionStore::new();
    if let Some(token) = local.session_token.clone() {
        session.set(token);
    }
    let gateway = Arc::new(ApiGateway::new(
        config.server_address.clone(),
        session.clone(),
    ));

    // Probe a restored token before entering the dashboard, so a stale
    // one falls back to a clean login instead of a first-cycle failure.
    if session.is_authenticated() {
        match gateway.validate_session().await {
            Ok(resp) if resp.valid => info!("restored session is valid"),
            Ok(_) => {
                warn!("restored session rejected, logging in again");
                session.clear();
            }
            Err(err) if err.is_session_expired() => {
                warn!("restored session expired, logging in again");
                session.clear();
            }
            Err(err) => return Err(err.into()),
        }
    }

    if !session.is_authenticated() {
        let credentials = config
            .credentials
            .clone()
            .ok_or("no usable session and no credentials configured")?;
        let login = gateway
            .login(&LoginRequest {
                email: credentials.email,
                password: credentials.password,
            })
            .await?;
        session.set(login.token.clone());
        local.session_token = Some(login.token);
        store.save(&local)?;
        info!("logged in");
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let reconciler = Arc::new(Reconciler::new(
        gateway,
        session.clone(),
        events_tx,
        config.metrics_per_page,
        config.alerts_per_page,
    ));
    let (_refresh_tx, refresh_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poll_task = tokio::spawn(poll_loop(
        reconciler.clone(),
        Duration::from_secs(config.poll_interval_seconds),
        refresh_rx,
        shutdown_rx,
    ));

    let event_reconciler = reconciler.clone();
    let mut event_task = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                DashboardEvent::RefreshCompleted => render_snapshot(&event_reconciler),
                DashboardEvent::RefreshFailed { message } => {
                    warn!(%message, "failed to fetch data, keeping last snapshot");
                }
                DashboardEvent::SessionExpired => {
                    warn!("session invalid, returning to login");
                    let mut state = store.load();
                    state.session_token = None;
                    if let Err(err) = store.save(&state) {
                        warn!(error = %err, "failed to clear persisted session");
                    }
                    return;
                }
                DashboardEvent::ThresholdsSaved => info!("thresholds updated"),
                DashboardEvent::ThresholdsSaveFailed { message } => {
                    warn!(%message, "failed to save thresholds");
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
        _ = &mut event_task => {}
    }

    shutdown_tx.send(true).ok();
    poll_task.await?;
    Ok(())
}
