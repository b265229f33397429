//! Application lifecycle: periodic list refresh and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::checker::{DisposableCheck, EducationalCheck, WellKnownCheck};

/// Refreshes the three domain lists, together or on a schedule.
pub struct ListRefresher {
    disposable: Arc<dyn DisposableCheck>,
    well_known: Arc<dyn WellKnownCheck>,
    educational: Arc<dyn EducationalCheck>,
}

impl ListRefresher {
    pub fn new(
        disposable: Arc<dyn DisposableCheck>,
        well_known: Arc<dyn WellKnownCheck>,
        educational: Arc<dyn EducationalCheck>,
    ) -> Self {
        Self {
            disposable,
            well_known,
            educational,
        }
    }

    /// Runs a refresh pass across all three lists.
    ///
    /// Every list is attempted even when an earlier one fails; the first
    /// failure is returned after the pass completes.
    pub async fn refresh_all(&self) -> anyhow::Result<()> {
        let mut first_error = None;

        for (name, outcome) in [
            ("disposable", self.disposable.refresh().await),
            ("well-known", self.well_known.refresh().await),
            ("educational", self.educational.refresh().await),
        ] {
            if let Err(e) = outcome {
                warn!("Refresh of {name} list failed: {e:#}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Spawns the background updater: one refresh pass per interval until
    /// `cancel` fires. Failures are logged and retried at the next tick.
    pub fn spawn_periodic(
        self: Arc<Self>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Starting periodic list updater (every {:.0?})",
                period
            );
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; the constructors already
            // refreshed, so consume it before entering the loop.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = self.refresh_all().await {
                            warn!("Periodic list refresh failed: {e:#}");
                        }
                    }
                    _ = cancel.cancelled() => {
                        info!("List updater stopped");
                        break;
                    }
                }
            }
        })
    }
}

/// Shuts down background tasks gracefully: signals the token and awaits the
/// updater if one is running.
pub async fn shutdown_gracefully(cancel: CancellationToken, updater: Option<JoinHandle<()>>) {
    cancel.cancel();
    if let Some(updater) = updater {
        let _ = updater.await;
    }
}
