use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;
use uuid::Uuid;

use super::prober::Prober;
use super::types::ProbeOutcome;
use crate::store::PrincipalId;

/// Scheduling parameters for one target
#[derive(Debug, Clone)]
pub struct ScheduledTarget {
    pub id: Uuid,
    pub principal: PrincipalId,
    pub url: String,
    pub interval: Duration,
}

/// One probe outcome on its way to the engine loop
#[derive(Debug)]
pub struct ProbeReport {
    pub target_id: Uuid,
    pub principal: PrincipalId,
    pub outcome: ProbeOutcome,
}

/// Source of truth for a target's current interval, consulted after each
/// probe; `None` means the target was removed and its task should end
#[async_trait]
pub trait IntervalSource: Send + Sync {
    async fn current_interval(&self, id: Uuid) -> Option<Duration>;
}

/// Monitoring scheduler - one independent timer task per target
///
/// Tasks feed outcomes into an mpsc channel consumed by the engine; a slow
/// target only ever delays its own next tick, never another target's. The
/// probe is awaited inline in the task loop, so two probes for the same
/// target can never overlap.
pub struct MonitorScheduler {
    prober: Arc<dyn Prober>,
    intervals: Arc<dyn IntervalSource>,
    report_tx: mpsc::Sender<ProbeReport>,
    initial_delay: Duration,
    tasks: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl MonitorScheduler {
    pub fn new(
        prober: Arc<dyn Prober>,
        intervals: Arc<dyn IntervalSource>,
        report_tx: mpsc::Sender<ProbeReport>,
        initial_delay: Duration,
    ) -> Self {
        Self { prober, intervals, report_tx, initial_delay, tasks: Mutex::new(HashMap::new()) }
    }

    /// Start the periodic probe task for a target
    ///
    /// The first tick fires after the configured initial delay (immediately
    /// by default). Rescheduling an already-scheduled id replaces its task.
    pub async fn schedule(&self, target: ScheduledTarget) {
        let prober = self.prober.clone();
        let intervals = self.intervals.clone();
        let report_tx = self.report_tx.clone();
        let initial_delay = self.initial_delay;
        let id = target.id;

        let handle = tokio::spawn(async move {
            let mut period = target.interval;
            let mut timer = interval_at(Instant::now() + initial_delay, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;

                let outcome = prober.probe(&target.url).await;
                let report =
                    ProbeReport { target_id: target.id, principal: target.principal, outcome };
                if report_tx.send(report).await.is_err() {
                    // Engine loop is gone; nothing left to report to
                    break;
                }

                // Interval changes take effect on the next scheduled tick
                match intervals.current_interval(target.id).await {
                    None => {
                        debug!("Target {} removed; ending its probe task", target.id);
                        break;
                    }
                    Some(current) if current != period => {
                        debug!(
                            "Target {} interval changed {:?} -> {:?}",
                            target.id, period, current
                        );
                        period = current;
                        timer = interval_at(Instant::now() + period, period);
                        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    }
                    Some(_) => {}
                }
            }
        });

        let mut tasks = self.tasks.lock().await;
        if let Some(previous) = tasks.insert(id, handle) {
            previous.abort();
        }
    }

    /// Cancel a target's future ticks without waiting for an in-flight probe
    pub async fn cancel(&self, id: Uuid) -> bool {
        match self.tasks.lock().await.remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every probe task and wait for them to wind down
    pub async fn shutdown(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().await;
            tasks
                .drain()
                .map(|(_, handle)| {
                    handle.abort();
                    handle
                })
                .collect()
        };
        let _ = futures::future::join_all(handles).await;
    }

    #[allow(dead_code)] // Public API method
    pub async fn active_count(&self) -> usize {
        self.tasks.lock().await.len()
    }
}
