//! The two periodic cycles: alert checks and status updates.
//!
//! Each cycle is a plain async method on [`AlertService`] so it can be driven
//! directly in tests; [`AlertService::spawn`] wraps each one in its own
//! interval task. Ticks use fixed-delay semantics: a cycle is awaited before
//! the next tick is taken, and a missed tick is pushed back rather than
//! replayed in a burst, so the same cycle never overlaps itself.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::evaluator::{evaluate, summarize};
use crate::publisher::{Channel, Publisher};
use crate::reading::WeatherReading;
use crate::source::{FetchError, WeatherSource};
use crate::thresholds::ThresholdStore;

/// Periods and limits for the two cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub alert_period: Duration,
    pub update_period: Duration,
    /// Upper bound on a single fetch, applied on top of the source's own.
    pub fetch_timeout: Duration,
}

impl Schedule {
    /// Reject zero periods and timeouts; a zero interval cannot tick.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (name, value) in [
            ("alert_period", self.alert_period),
            ("update_period", self.update_period),
            ("fetch_timeout", self.fetch_timeout),
        ] {
            if value.is_zero() {
                return Err(ScheduleError::Zero(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            alert_period: Duration::from_secs(60),
            update_period: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Fetches, evaluates and publishes. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AlertService {
    source: Arc<dyn WeatherSource>,
    publisher: Arc<dyn Publisher>,
    thresholds: Arc<ThresholdStore>,
    schedule: Schedule,
}

impl AlertService {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        publisher: Arc<dyn Publisher>,
        thresholds: Arc<ThresholdStore>,
        schedule: Schedule,
    ) -> Result<Self, ScheduleError> {
        schedule.validate()?;
        Ok(Self {
            source,
            publisher,
            thresholds,
            schedule,
        })
    }

    /// Fetch a reading, turning every failure into the empty reading.
    pub async fn fetch_or_empty(&self, label: &str) -> WeatherReading {
        let timeout = self.schedule.fetch_timeout;
        let result = match tokio::time::timeout(timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        match result {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("[{}] weather fetch failed, using empty reading: {}", label, e);
                WeatherReading::empty()
            }
        }
    }

    /// One alert cycle. Returns how many alert messages were published.
    pub async fn run_alert_cycle(&self) -> usize {
        let reading = self.fetch_or_empty("alerts").await;
        let evaluation = evaluate(&reading, &self.thresholds);

        if !evaluation.triggered() {
            log::debug!("[alerts] no alert conditions met");
            return 0;
        }

        let mut published = 0;
        for alert in &evaluation.alerts {
            let message = alert.message();
            match self.publisher.publish(Channel::Alerts, &message).await {
                Ok(()) => {
                    log::info!("[alerts] published: {}", message);
                    published += 1;
                }
                Err(e) => log::error!("[alerts] failed to publish '{}': {}", message, e),
            }
        }
        published
    }

    /// One update cycle. Always attempts exactly one publish.
    pub async fn run_update_cycle(&self) -> bool {
        let reading = self.fetch_or_empty("updates").await;
        let message = summarize(&reading);

        match self.publisher.publish(Channel::Updates, &message).await {
            Ok(()) => {
                log::info!("[updates] published: {}", message);
                true
            }
            Err(e) => {
                log::error!("[updates] failed to publish '{}': {}", message, e);
                false
            }
        }
    }

    /// Start both cycles as independent tasks.
    ///
    /// The first tick of each fires immediately. Both exit when `shutdown`
    /// fires or its sender is dropped.
    pub fn spawn(&self, shutdown: watch::Receiver<()>) -> ServiceHandle {
        let alerts = {
            let service = self.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                run_periodic("alerts", service.schedule.alert_period, shutdown, || {
                    let service = service.clone();
                    async move {
                        service.run_alert_cycle().await;
                    }
                })
                .await
            })
        };

        let updates = {
            let service = self.clone();
            tokio::spawn(async move {
                run_periodic("updates", service.schedule.update_period, shutdown, || {
                    let service = service.clone();
                    async move {
                        service.run_update_cycle().await;
                    }
                })
                .await
            })
        };

        ServiceHandle {
            shutdown_tx: None,
            tasks: vec![alerts, updates],
        }
    }

    /// Like [`spawn`](Self::spawn), but owns its own shutdown channel so the
    /// caller can stop the service through the handle.
    pub fn start(&self) -> ServiceHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let mut handle = self.spawn(shutdown_rx);
        handle.shutdown_tx = Some(shutdown_tx);
        handle
    }
}

/// Tick `cycle` every `period` until shutdown.
async fn run_periodic<F, Fut>(
    label: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<()>,
    mut cycle: F,
) where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    log::info!("[{}] starting cycle ({:?} interval)", label, period);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                log::info!("[{}] shutdown signal received, exiting", label);
                break;
            }
            _ = interval.tick() => {
                cycle().await;
            }
        }
    }
}

/// Running cycle tasks.
pub struct ServiceHandle {
    shutdown_tx: Option<watch::Sender<()>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ServiceHandle {
    /// Signal both cycles (if this handle owns the channel) and wait for them.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.join().await;
    }

    /// Wait for both cycle tasks to finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                log::error!("Cycle task failed: {}", e);
            }
        }
    }
}
