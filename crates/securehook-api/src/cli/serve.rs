//! `shook serve`: load endpoints, serve webhooks until a shutdown signal.
//!
//! Endpoints are created and deleted by other `shook` processes, so the
//! routing table is re-synced with storage on an interval and on SIGHUP.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use console::style;
use tokio::sync::{Notify, broadcast};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use securehook_core::event::EventBus;
use securehook_core::service::lifecycle::EndpointLifecycle;
use securehook_infra::crypto::hash::Sha256CredentialHasher;
use securehook_infra::webhook::registry::WebhookRegistry;
use securehook_types::event::WebhookEvent;
use securehook_types::registration::EndpointId;

use crate::http::router::{RouterState, build_router};
use crate::state::{AppState, ConcreteSetupService};

pub async fn serve(state: &AppState, quiet: bool) -> Result<()> {
    let config = &state.config;
    let bus = EventBus::new(config.event_bus_capacity);
    let registry = WebhookRegistry::new();
    let lifecycle = Arc::new(EndpointLifecycle::new(
        Arc::new(registry.clone()),
        Arc::new(Sha256CredentialHasher::new()),
        bus.clone(),
    ));

    let loaded = lifecycle
        .load_all(state.setup_service.repository())
        .await?;
    tracing::info!(data_dir = %state.data_dir.display(), loaded, "endpoints loaded");

    let cancel = CancellationToken::new();
    let event_log = tokio::spawn(log_events(bus.subscribe(), cancel.clone()));

    let reload = Arc::new(Notify::new());
    let period = (config.sync_interval_secs > 0)
        .then(|| Duration::from_secs(config.sync_interval_secs));
    let endpoint_sync = tokio::spawn(sync_endpoints(
        Arc::clone(&lifecycle),
        Arc::clone(&state.setup_service),
        period,
        Arc::clone(&reload),
        cancel.clone(),
    ));
    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(Arc::clone(&reload), cancel.clone()));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} SecureHook listening on {} ({} endpoint{})",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan(),
            loaded,
            if loaded == 1 { "" } else { "s" }
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    let router = build_router(RouterState {
        registry: registry.clone(),
        max_body_bytes: config.max_body_bytes,
    });
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Err(e) = endpoint_sync.await {
        tracing::warn!("endpoint sync task failed: {e}");
    }
    for id in registry.endpoint_ids() {
        if let Ok(id) = EndpointId::try_from(id) {
            lifecycle.unload_entry(&id);
        }
    }
    if let Err(e) = event_log.await {
        tracing::warn!("event log task failed: {e}");
    }
    state.db_pool.close().await;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Log every fired event until `cancel` fires or the bus closes.
pub async fn log_events(mut rx: broadcast::Receiver<WebhookEvent>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(event) => {
                    tracing::debug!(
                        event_type = %event.event_type,
                        endpoint_id = %event.payload.endpoint_id,
                        fired_at = %event.fired_at,
                        keys = event.payload.data.len(),
                        "event fired"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "event log lagged, skipping {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    tracing::debug!("event log stopped");
}

/// Re-sync the routing table with storage every `period` (if any) and
/// whenever `reload` is notified, until `cancel` fires.
pub async fn sync_endpoints(
    lifecycle: Arc<EndpointLifecycle<WebhookRegistry>>,
    setup: Arc<ConcreteSetupService>,
    period: Option<Duration>,
    reload: Arc<Notify>,
    cancel: CancellationToken,
) {
    // Endpoints were just loaded, so the first pass waits a full period.
    let mut ticker = period.map(|period| {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = next_tick(&mut ticker) => {}
            _ = reload.notified() => tracing::debug!("endpoint reload requested"),
        }

        if let Err(e) = lifecycle.sync(setup.repository()).await {
            tracing::warn!(error = %e, "failed to sync webhook routes");
        }
    }

    tracing::debug!("endpoint sync stopped");
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Turn SIGHUP into a reload request.
#[cfg(unix)]
async fn reload_on_hangup(reload: Arc<Notify>, cancel: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!("failed to install SIGHUP handler: {e}");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = hangup.recv() => match received {
                Some(()) => {
                    tracing::info!("SIGHUP received, reloading endpoints");
                    reload.notify_one();
                }
                None => break,
            }
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
