//! The producer run loop.
//!
//! Each tick emits a batch of one to three records and then sleeps. The
//! sleep races the shutdown future, so a stop request never waits a full
//! interval. A send that is already in flight is allowed to finish.

use crate::kafka::{Connection, DeliveryOutcome, Dispatcher, Router, Session};
use crate::record::Synthesizer;
use crate::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Pause between batches.
    pub interval: Duration,
    /// Stop on its own after this many batches.
    pub max_batches: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_batches: None,
        }
    }
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: u64,
    pub delivered: u64,
    pub dropped: u64,
}

pub struct Runner<'a, S: Session, R> {
    connection: Connection<S>,
    synthesizer: Synthesizer<'a, R>,
    router: Router,
    dispatcher: Dispatcher,
    settings: RunSettings,
}

impl<'a, S: Session, R: Rng> Runner<'a, S, R> {
    pub fn new(
        connection: Connection<S>,
        synthesizer: Synthesizer<'a, R>,
        router: Router,
        dispatcher: Dispatcher,
        settings: RunSettings,
    ) -> Self {
        Self {
            connection,
            synthesizer,
            router,
            dispatcher,
            settings,
        }
    }

    /// Produces until `shutdown` resolves or the batch limit is reached,
    /// then closes the connection.
    ///
    /// Delivery failures are counted, never returned. The only error is a
    /// failed final flush.
    pub async fn run<F>(mut self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(interval = ?self.settings.interval, "Starting log production");
        let mut summary = RunSummary::default();

        'running: loop {
            let batch = self.synthesizer.batch_size();

            for _ in 0..batch {
                if stop_requested(&mut shutdown).await {
                    info!("Shutdown requested");
                    break 'running;
                }

                let record = self.synthesizer.generate();
                let route = self.router.route(&record);

                match self
                    .dispatcher
                    .send(self.connection.session(), &route, &record)
                    .await
                {
                    DeliveryOutcome::Delivered(_) => summary.delivered += 1,
                    DeliveryOutcome::Dropped { .. } => summary.dropped += 1,
                }
            }

            summary.batches += 1;

            if let Some(max_batches) = self.settings.max_batches {
                if summary.batches >= max_batches {
                    info!(max_batches, "Batch limit reached");
                    break;
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = sleep(self.settings.interval) => {}
            }
        }

        if let Err(e) = self.connection.close() {
            error!("Failed to close producer session: {}", e);
            return Err(e);
        }

        info!(
            batches = summary.batches,
            delivered = summary.delivered,
            dropped = summary.dropped,
            "Log production stopped"
        );
        Ok(summary)
    }
}

/// Polls `shutdown` once without waiting.
async fn stop_requested<F: Future<Output = ()> + Unpin>(shutdown: &mut F) -> bool {
    tokio::select! {
        biased;
        _ = shutdown => true,
        _ = std::future::ready(()) => false,
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere).
///
/// If no handler can be installed the future never resolves and the process
/// keeps producing until it is killed.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM - initiating graceful shutdown");
                    }
                    result = tokio::signal::ctrl_c() => match result {
                        Ok(()) => info!("Received SIGINT (Ctrl+C) - initiating graceful shutdown"),
                        Err(e) => {
                            error!("Unable to listen for SIGINT: {}", e);
                            std::future::pending::<()>().await;
                        }
                    },
                }
                return;
            }
            Err(e) => {
                warn!("Unable to register SIGTERM handler: {}", e);
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C - initiating graceful shutdown"),
        Err(e) => {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
