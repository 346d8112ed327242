#![allow(dead_code)]
/// Engine module - coordinates all components
///
/// The engine is the core coordinator that:
/// - Resumes persisted targets and schedules their probe tasks
/// - Feeds every probe outcome through the debounce tracker, store, and
///   history ledger in a fixed order
/// - Opens and closes incidents on confirmed transitions and hands alerts
///   to the notification dispatcher
///
/// The boundary layer (chat commands) talks to the engine through its
/// facade methods; the engine consults the authorization provider before
/// any catalog mutation.


use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::AuthorizationProvider;
use crate::config::Config;
use crate::monitoring::prober::Prober;
use crate::monitoring::scheduler::{
    IntervalSource, MonitorScheduler, ProbeReport, ScheduledTarget,
};
use crate::monitoring::tracker::{DebouncePolicy, StatusTracker, TargetState};
use crate::monitoring::types::{ProbeOutcome, Transition};
use crate::notify::{Dispatcher, NotificationEvent, NotificationSink, TransitionKind};
use crate::store::{FileStore, HistoryRecord, Incident, PrincipalId, Store, StoreError, Target};
use crate::validation;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("admin {0} is not authorized")]
    Unauthorized(PrincipalId),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-report processing shared by the result loop and the tests
struct EngineCore {
    store: Arc<dyn Store>,
    tracker: StatusTracker,
    dispatcher: Dispatcher,
}

impl EngineCore {
    /// Fold one probe outcome into the system state
    ///
    /// Fixed order per report: existence check, tracker, status update,
    /// history append, then incident/notification work. A report whose
    /// target was removed while the probe was in flight mutates nothing.
    async fn process_report(&self, report: ProbeReport) {
        let ProbeReport { target_id, principal, outcome } = report;

        let Some(target) = self.store.get_target(principal, target_id).await else {
            debug!("Discarding probe result for removed target {}", target_id);
            return;
        };

        let mut state = TargetState {
            status: target.status,
            consecutive_failures: target.consecutive_failures,
            consecutive_successes: target.consecutive_successes,
        };
        let transition = self.tracker.observe(&mut state, &outcome);
        let status_changed_at = transition.map(|_| outcome.timestamp);

        if let Err(error) = self
            .store
            .update_status(
                principal,
                target_id,
                state.status,
                state.consecutive_failures,
                state.consecutive_successes,
                outcome.timestamp,
                status_changed_at,
            )
            .await
        {
            debug!("Target {} vanished before status update: {}", target_id, error);
            return;
        }

        // History always reflects the outcome that drove the status decision
        let record = HistoryRecord::from_outcome(target_id, &outcome);
        if let Err(error) = self.store.append_record(principal, target_id, record).await {
            debug!("Target {} vanished before history append: {}", target_id, error);
            return;
        }

        match transition {
            Some(Transition::WentDown) => {
                let trigger = outcome_summary(&outcome);
                match self
                    .store
                    .open_incident(principal, target_id, outcome.timestamp, Some(trigger))
                    .await
                {
                    Ok(incident) => {
                        info!("Target {} ({}) confirmed DOWN: {}", target_id, target.url,
                            outcome_summary(&outcome));
                        self.dispatcher.enqueue(alert(
                            &target,
                            principal,
                            TransitionKind::Down,
                            &outcome,
                            &incident,
                        ));
                    }
                    Err(error) => {
                        debug!("Target {} vanished before incident open: {}", target_id, error)
                    }
                }
            }
            Some(Transition::WentUp) => {
                match self
                    .store
                    .close_incident(
                        principal,
                        target_id,
                        outcome.timestamp,
                        Some(outcome_summary(&outcome)),
                    )
                    .await
                {
                    Ok(Some(incident)) => {
                        info!("Target {} ({}) recovered", target_id, target.url);
                        self.dispatcher.enqueue(alert(
                            &target,
                            principal,
                            TransitionKind::Up,
                            &outcome,
                            &incident,
                        ));
                    }
                    Ok(None) => {
                        // First confirmation after startup or add: the target
                        // converged to UP without a preceding incident, so
                        // there is nothing to alert on
                        debug!("Target {} confirmed UP with no open incident", target_id);
                    }
                    Err(error) => {
                        debug!("Target {} vanished before incident close: {}", target_id, error)
                    }
                }
            }
            None => {}
        }
    }
}

fn alert(
    target: &Target,
    principal: PrincipalId,
    kind: TransitionKind,
    outcome: &ProbeOutcome,
    incident: &Incident,
) -> NotificationEvent {
    NotificationEvent {
        target_id: target.id,
        principal,
        kind,
        timestamp: outcome.timestamp,
        incident_id: incident.id,
        url: target.url.clone(),
        status_code: outcome.status_code,
        error_message: outcome.error_message.clone(),
        latency_ms: outcome.latency_ms,
    }
}

/// One-line summary of an outcome for incident records and logs
fn outcome_summary(outcome: &ProbeOutcome) -> String {
    match (outcome.error, outcome.status_code) {
        (Some(kind), Some(code)) => format!("{kind} (status {code})"),
        (Some(kind), None) => match &outcome.error_message {
            Some(message) => format!("{kind}: {message}"),
            None => kind.to_string(),
        },
        (None, Some(code)) => format!("status {code}"),
        (None, None) => "ok".to_string(),
    }
}

/// Main engine for the upwatch service
pub struct Engine {
    store: Arc<dyn Store>,
    scheduler: Arc<MonitorScheduler>,
    auth: Arc<dyn AuthorizationProvider>,
    dispatcher: Dispatcher,
    default_interval_seconds: u64,
    shutdown_tx: watch::Sender<bool>,
    loop_handle: JoinHandle<()>,
    dispatch_handle: JoinHandle<()>,
}

impl Engine {
    /// Build the engine, resume every persisted target, and start the
    /// result loop
    pub async fn start(
        config: &Config,
        store: Arc<FileStore>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn NotificationSink>,
        auth: Arc<dyn AuthorizationProvider>,
    ) -> Result<Self> {
        let (report_tx, mut report_rx) = mpsc::channel::<ProbeReport>(100);

        let intervals: Arc<dyn IntervalSource> = store.clone();
        let scheduler = Arc::new(MonitorScheduler::new(
            prober,
            intervals,
            report_tx,
            Duration::from_secs(config.monitoring.initial_delay_seconds),
        ));
        let store: Arc<dyn Store> = store;

        let (dispatcher, dispatch_handle) = Dispatcher::start(sink);
        let tracker = StatusTracker::new(DebouncePolicy {
            down_threshold: config.debounce.down_threshold,
            up_threshold: config.debounce.up_threshold,
        });
        let core =
            EngineCore { store: store.clone(), tracker, dispatcher: dispatcher.clone() };

        info!("Loading targets from the store...");
        let targets = store.all_targets().await;
        info!("Found {} monitored targets", targets.len());

        for (principal, target) in &targets {
            scheduler
                .schedule(ScheduledTarget {
                    id: target.id,
                    principal: *principal,
                    url: target.url.clone(),
                    interval: Duration::from_secs(target.interval_seconds),
                })
                .await;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let loop_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_report = report_rx.recv() => match maybe_report {
                        Some(report) => core.process_report(report).await,
                        None => break,
                    },
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        info!("Engine started - processing probe results");

        Ok(Self {
            store,
            scheduler,
            auth,
            dispatcher,
            default_interval_seconds: config.monitoring.interval_seconds,
            shutdown_tx,
            loop_handle,
            dispatch_handle,
        })
    }

    /// Add a url to an admin's watch list and start probing it
    pub async fn add_url(
        &self,
        principal: PrincipalId,
        url: &str,
        interval_seconds: Option<u64>,
    ) -> Result<Target, EngineError> {
        if !self.auth.is_authorized(principal) {
            return Err(EngineError::Unauthorized(principal));
        }

        let url = validation::normalize_url(url);
        let check = validation::validate_http_endpoint(&url);
        if !check.is_valid {
            return Err(EngineError::Validation(check.message()));
        }

        let interval_seconds = interval_seconds.unwrap_or(self.default_interval_seconds);
        validation::validate_check_interval(interval_seconds)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        let target = self.store.add_target(principal, &url, interval_seconds).await?;
        self.scheduler
            .schedule(ScheduledTarget {
                id: target.id,
                principal,
                url: target.url.clone(),
                interval: Duration::from_secs(interval_seconds),
            })
            .await;

        info!("Admin {} now monitoring {} every {}s", principal, target.url, interval_seconds);
        Ok(target)
    }

    /// Stop monitoring a target; its in-flight probe result, if any, is
    /// discarded by the result loop
    pub async fn remove_url(
        &self,
        principal: PrincipalId,
        id: Uuid,
    ) -> Result<Target, EngineError> {
        if !self.auth.is_authorized(principal) {
            return Err(EngineError::Unauthorized(principal));
        }

        let target = self.store.remove_target(principal, id).await?;
        self.scheduler.cancel(id).await;

        info!("Admin {} stopped monitoring {}", principal, target.url);
        Ok(target)
    }

    /// Change a target's ping interval; takes effect on its next tick
    pub async fn set_interval(
        &self,
        principal: PrincipalId,
        id: Uuid,
        interval_seconds: u64,
    ) -> Result<(), EngineError> {
        if !self.auth.is_authorized(principal) {
            return Err(EngineError::Unauthorized(principal));
        }

        validation::validate_check_interval(interval_seconds)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        self.store.set_interval(principal, id, interval_seconds).await?;
        Ok(())
    }

    pub async fn list(&self, principal: PrincipalId) -> Vec<Target> {
        self.store.list_targets(principal).await
    }

    pub async fn recent_history(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, EngineError> {
        Ok(self.store.recent_records(principal, id, limit).await?)
    }

    pub async fn uptime(
        &self,
        principal: PrincipalId,
        id: Uuid,
        window: Duration,
    ) -> Result<Option<f64>, EngineError> {
        Ok(self.store.uptime_ratio(principal, id, window).await?)
    }

    pub async fn incidents(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<Incident>, EngineError> {
        Ok(self.store.incidents(principal, id, limit).await?)
    }

    /// Stop probing, drain the alert queue, and save state
    pub async fn shutdown(self) {
        info!("Shutting down engine...");

        let _ = self.shutdown_tx.send(true);
        self.scheduler.shutdown().await;
        let _ = self.loop_handle.await;

        // Dropping the last queue handle lets the worker drain and exit
        drop(self.dispatcher);
        let _ = self.dispatch_handle.await;

        self.store.flush().await;
        info!("Engine stopped");
    }
}
