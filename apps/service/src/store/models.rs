use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::SystemTime;
use uuid::Uuid;

use crate::monitoring::types::{ProbeOutcome, TargetStatus};

/// Chat id of the owning admin; the hard partition key for all stored data
pub type PrincipalId = i64;

/// Target model - one monitored URL and its live state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub url: String,
    pub interval_seconds: u64,
    #[serde(with = "unix_ts")]
    pub created_at: SystemTime,
    pub status: TargetStatus,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    #[serde(default, with = "unix_ts_opt")]
    pub last_checked: Option<SystemTime>,
    #[serde(default, with = "unix_ts_opt")]
    pub last_status_change: Option<SystemTime>,
}

impl Target {
    /// Create a new target with no probe history yet
    pub fn new(url: impl Into<String>, interval_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            interval_seconds,
            created_at: SystemTime::now(),
            status: TargetStatus::Unknown,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_checked: None,
            last_status_change: None,
        }
    }
}

/// HistoryRecord model - append-only summary of one probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub target_id: Uuid,
    #[serde(with = "unix_ts")]
    pub timestamp: SystemTime,
    pub success: bool,
    pub status_code: Option<u16>,
    pub latency_ms: u64,
    pub error_message: Option<String>,
}

impl HistoryRecord {
    pub fn from_outcome(target_id: Uuid, outcome: &ProbeOutcome) -> Self {
        Self {
            target_id,
            timestamp: outcome.timestamp,
            success: outcome.success,
            status_code: outcome.status_code,
            latency_ms: outcome.latency_ms,
            error_message: outcome.error_message.clone(),
        }
    }
}

/// Incident model - a bounded DOWN interval for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub target_id: Uuid,
    #[serde(with = "unix_ts")]
    pub started_at: SystemTime,
    #[serde(default, with = "unix_ts_opt")]
    pub ended_at: Option<SystemTime>,
    /// Summary of the outcome that confirmed the DOWN transition
    pub trigger: Option<String>,
    /// Summary of the outcome that confirmed the UP transition
    pub resolution: Option<String>,
}

impl Incident {
    pub fn open(target_id: Uuid, started_at: SystemTime, trigger: Option<String>) -> Self {
        Self { id: Uuid::new_v4(), target_id, started_at, ended_at: None, trigger, resolution: None }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Bounded probe history and incident log for one target
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetHistory {
    #[serde(default)]
    pub records: VecDeque<HistoryRecord>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

/// One principal's partition: targets in insertion order plus their ledgers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub history: HashMap<Uuid, TargetHistory>,
}

/// Root of the persisted document, keyed by principal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub principals: HashMap<PrincipalId, Partition>,
}

impl PersistedState {
    /// Drop in-flight debounce state after a restart
    ///
    /// Counters persisted mid-confirmation are meaningless once the process
    /// has been down for an unknown span, so every target re-earns its next
    /// transition from scratch.
    pub fn reset_counters(&mut self) {
        for partition in self.principals.values_mut() {
            for target in &mut partition.targets {
                target.consecutive_failures = 0;
                target.consecutive_successes = 0;
            }
        }
    }

    pub fn target_count(&self) -> usize {
        self.principals.values().map(|p| p.targets.len()).sum()
    }
}

/// Serialize `SystemTime` as whole unix seconds
pub(crate) mod unix_ts {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = time.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        serializer.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}

/// Serialize `Option<SystemTime>` as nullable unix seconds
pub(crate) mod unix_ts_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(
        time: &Option<SystemTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer
                .serialize_some(&t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SystemTime>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}
