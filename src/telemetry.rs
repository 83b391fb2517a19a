//! Tracing/logging initialization.

use crate::config::LogFormat;
use crate::core::events::EventBus;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Safe to call
/// multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().with_target(false).try_init(),
    };
}

/// Log every event published on `bus` until all publishers are gone.
///
/// The task resolves to the number of events it logged.
pub fn log_events(bus: &EventBus) -> JoinHandle<usize> {
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        let mut logged = 0;
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    tracing::info!(
                        event_id = %envelope.id,
                        path = envelope.event.path(),
                        "view revalidated"
                    );
                    logged += 1;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log fell behind");
                }
                Err(RecvError::Closed) => break logged,
            }
        }
    })
}
