use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::PrincipalId;

/// Which confirmed transition a notification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Down,
    Up,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Down => write!(f, "down"),
            TransitionKind::Up => write!(f, "up"),
        }
    }
}

/// One alert on its way to the owning admin
///
/// Generated exactly once per confirmed transition; the sink sees each event
/// at most once.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub target_id: Uuid,
    pub principal: PrincipalId,
    pub kind: TransitionKind,
    pub timestamp: SystemTime,
    pub incident_id: Uuid,
    pub url: String,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub latency_ms: u64,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("notification sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Transport that carries alerts to an admin; implemented by the chat layer
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(
        &self,
        principal: PrincipalId,
        event: &NotificationEvent,
    ) -> Result<(), DeliveryError>;
}

/// Notification dispatcher - queued handoff between tracker and sink
///
/// Events are queued so a slow or unavailable sink cannot stall probing.
/// Delivery failures are logged and the event is considered
/// dispatched-attempted; the core never retries.
#[derive(Clone)]
pub struct Dispatcher {
    event_tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl Dispatcher {
    /// Spawn the delivery worker and return the queue handle
    pub fn start(sink: Arc<dyn NotificationSink>) -> (Self, JoinHandle<()>) {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<NotificationEvent>();

        let worker = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if let Err(error) = sink.send(event.principal, &event).await {
                    warn!(
                        "Failed to deliver {} alert for {} to admin {}: {}",
                        event.kind, event.url, event.principal, error
                    );
                }
            }
        });

        (Self { event_tx }, worker)
    }

    /// Hand one event to the delivery queue
    pub fn enqueue(&self, event: NotificationEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Dispatcher worker is gone; dropping notification event");
        }
    }
}

/// Default sink: writes the alert to the log
///
/// The real chat transport lives outside this service and plugs in through
/// [`NotificationSink`].
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn send(
        &self,
        principal: PrincipalId,
        event: &NotificationEvent,
    ) -> Result<(), DeliveryError> {
        let when: DateTime<Utc> = event.timestamp.into();
        match event.kind {
            TransitionKind::Down => info!(
                target: "upwatch::alerts",
                admin = principal,
                url = %event.url,
                status_code = ?event.status_code,
                error = event.error_message.as_deref().unwrap_or("unknown error"),
                "URL DOWN at {}",
                when.format("%Y-%m-%d %H:%M:%S"),
            ),
            TransitionKind::Up => info!(
                target: "upwatch::alerts",
                admin = principal,
                url = %event.url,
                latency_ms = event.latency_ms,
                "URL recovered at {}",
                when.format("%Y-%m-%d %H:%M:%S"),
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(
            &self,
            _principal: PrincipalId,
            event: &NotificationEvent,
        ) -> Result<(), DeliveryError> {
            self.delivered.lock().unwrap().push(event.incident_id);
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl NotificationSink for BrokenSink {
        async fn send(
            &self,
            _principal: PrincipalId,
            _event: &NotificationEvent,
        ) -> Result<(), DeliveryError> {
            Err(DeliveryError::SinkUnavailable("transport offline".into()))
        }
    }

    fn event(incident_id: Uuid) -> NotificationEvent {
        NotificationEvent {
            target_id: Uuid::new_v4(),
            principal: 1,
            kind: TransitionKind::Down,
            timestamp: SystemTime::now(),
            incident_id,
            url: "https://example.com".to_string(),
            status_code: None,
            error_message: Some("timeout".to_string()),
            latency_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_each_event_reaches_sink_exactly_once() {
        let sink = Arc::new(RecordingSink::default());
        let (dispatcher, worker) = Dispatcher::start(sink.clone());

        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            dispatcher.enqueue(event(*id));
        }

        // Dropping the queue lets the worker drain and exit
        drop(dispatcher);
        tokio::time::timeout(Duration::from_secs(2), worker).await.unwrap().unwrap();

        assert_eq!(*sink.delivered.lock().unwrap(), ids);
    }

    #[tokio::test]
    async fn test_sink_failure_is_not_fatal() {
        let (dispatcher, worker) = Dispatcher::start(Arc::new(BrokenSink));

        dispatcher.enqueue(event(Uuid::new_v4()));
        dispatcher.enqueue(event(Uuid::new_v4()));

        drop(dispatcher);
        // Worker survives every failed delivery and drains the queue
        tokio::time::timeout(Duration::from_secs(2), worker).await.unwrap().unwrap();
    }
}
