use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::{
    HistoryRecord, Incident, Partition, PersistedState, PrincipalId, Target, TargetHistory,
};
use crate::monitoring::scheduler::IntervalSource;
use crate::monitoring::types::TargetStatus;

/// Closed incidents kept per target before the oldest are evicted
const MAX_INCIDENTS_PER_TARGET: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("url {0} is already monitored for this admin")]
    DuplicateTarget(String),

    #[error("no monitored target with id {0}")]
    NotFound(Uuid),
}

/// Bounds on per-target history retention
#[derive(Debug, Clone, Copy)]
pub struct RetentionLimits {
    pub max_records: usize,
    pub max_record_age: Duration,
}

impl Default for RetentionLimits {
    fn default() -> Self {
        Self { max_records: 500, max_record_age: Duration::from_secs(7 * 24 * 3600) }
    }
}

/// Store trait for the durable target catalog and history ledger
///
/// Partitioning by principal is a hard isolation boundary: no operation can
/// read or write across partitions. Every mutation is persisted atomically
/// before the call returns.
#[async_trait]
pub trait Store: Send + Sync {
    // -- target catalog --

    /// Add a url to a principal's partition; uniqueness is checked and the
    /// insert performed under one lock acquisition
    async fn add_target(
        &self,
        principal: PrincipalId,
        url: &str,
        interval_seconds: u64,
    ) -> Result<Target, StoreError>;

    /// Remove a target and its history; future probe results for it are
    /// discarded by the engine's existence check
    async fn remove_target(&self, principal: PrincipalId, id: Uuid) -> Result<Target, StoreError>;

    async fn get_target(&self, principal: PrincipalId, id: Uuid) -> Option<Target>;

    /// Targets in insertion order
    async fn list_targets(&self, principal: PrincipalId) -> Vec<Target>;

    /// Snapshot of every target across partitions, for scheduling at startup
    async fn all_targets(&self) -> Vec<(PrincipalId, Target)>;

    /// Fold a tracker decision into the target; called only by the engine
    async fn update_status(
        &self,
        principal: PrincipalId,
        id: Uuid,
        status: TargetStatus,
        consecutive_failures: u32,
        consecutive_successes: u32,
        checked_at: SystemTime,
        status_changed_at: Option<SystemTime>,
    ) -> Result<(), StoreError>;

    /// Change a target's interval; picked up at its next scheduled tick
    async fn set_interval(
        &self,
        principal: PrincipalId,
        id: Uuid,
        interval_seconds: u64,
    ) -> Result<(), StoreError>;

    // -- history ledger --

    /// Append one probe record, evicting oldest-first past the retention
    /// bounds
    async fn append_record(
        &self,
        principal: PrincipalId,
        id: Uuid,
        record: HistoryRecord,
    ) -> Result<(), StoreError>;

    /// Recent records, most-recent-first
    async fn recent_records(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, StoreError>;

    /// Fraction of succeeding probes inside the window; `None` with no
    /// samples
    async fn uptime_ratio(
        &self,
        principal: PrincipalId,
        id: Uuid,
        window: Duration,
    ) -> Result<Option<f64>, StoreError>;

    async fn open_incident(
        &self,
        principal: PrincipalId,
        id: Uuid,
        started_at: SystemTime,
        trigger: Option<String>,
    ) -> Result<Incident, StoreError>;

    /// Close the open incident, if any, and return it
    async fn close_incident(
        &self,
        principal: PrincipalId,
        id: Uuid,
        ended_at: SystemTime,
        resolution: Option<String>,
    ) -> Result<Option<Incident>, StoreError>;

    async fn incidents(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<Incident>, StoreError>;

    /// Force a save of the current state (shutdown path)
    async fn flush(&self);
}

struct StoreInner {
    state: PersistedState,
    /// Set when the last save failed; the in-memory state is ahead of disk
    /// until the next successful write clears it
    degraded: bool,
}

/// File-backed store: JSON document, written via temp-file-then-rename so a
/// crash mid-save can never leave a torn file behind
pub struct FileStore {
    path: PathBuf,
    limits: RetentionLimits,
    inner: RwLock<StoreInner>,
}

impl FileStore {
    /// Load persisted state, or start empty when the file is missing or
    /// unreadable; a corrupt document must never fail startup
    pub fn load(path: impl Into<PathBuf>, limits: RetentionLimits) -> Self {
        let path = path.into();

        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PersistedState>(&raw) {
                Ok(mut state) => {
                    state.reset_counters();
                    info!(
                        "Loaded {} targets across {} admins from {}",
                        state.target_count(),
                        state.principals.len(),
                        path.display()
                    );
                    state
                }
                Err(error) => {
                    warn!(
                        "State file {} is corrupt ({}); starting with an empty target set",
                        path.display(),
                        error
                    );
                    PersistedState::default()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("No state file at {}; starting with an empty target set", path.display());
                PersistedState::default()
            }
            Err(error) => {
                warn!(
                    "Could not read state file {} ({}); starting with an empty target set",
                    path.display(),
                    error
                );
                PersistedState::default()
            }
        };

        Self { path, limits, inner: RwLock::new(StoreInner { state, degraded: false }) }
    }

    /// Whether the last save failed and disk lags the in-memory state
    #[allow(dead_code)] // Public API method
    pub async fn is_degraded(&self) -> bool {
        self.inner.read().await.degraded
    }

    fn persist(&self, inner: &mut StoreInner) {
        match self.write_atomic(&inner.state) {
            Ok(()) => {
                if inner.degraded {
                    info!("Persistence recovered; state file {} is current again", self.path.display());
                    inner.degraded = false;
                }
            }
            Err(error) => {
                warn!(
                    "Failed to persist state to {} ({}); keeping mutation in memory",
                    self.path.display(),
                    error
                );
                inner.degraded = true;
            }
        }
    }

    fn write_atomic(&self, state: &PersistedState) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)
    }

    fn evict(history: &mut TargetHistory, limits: &RetentionLimits) {
        while history.records.len() > limits.max_records {
            history.records.pop_front();
        }

        let cutoff = SystemTime::now().checked_sub(limits.max_record_age);
        if let Some(cutoff) = cutoff {
            while history.records.front().is_some_and(|r| r.timestamp < cutoff) {
                history.records.pop_front();
            }
        }

        // Incident log is bounded too; only closed incidents are evicted
        while history.incidents.len() > MAX_INCIDENTS_PER_TARGET {
            match history.incidents.iter().position(|i| !i.is_open()) {
                Some(oldest_closed) => {
                    history.incidents.remove(oldest_closed);
                }
                None => break,
            }
        }
    }
}

fn partition_target_mut<'a>(
    partition: Option<&'a mut Partition>,
    id: Uuid,
) -> Result<&'a mut Target, StoreError> {
    partition
        .and_then(|p| p.targets.iter_mut().find(|t| t.id == id))
        .ok_or(StoreError::NotFound(id))
}

fn partition_history_mut<'a>(
    partition: Option<&'a mut Partition>,
    id: Uuid,
) -> Result<&'a mut TargetHistory, StoreError> {
    let partition = partition.ok_or(StoreError::NotFound(id))?;
    if !partition.targets.iter().any(|t| t.id == id) {
        return Err(StoreError::NotFound(id));
    }
    Ok(partition.history.entry(id).or_default())
}

#[async_trait]
impl Store for FileStore {
    async fn add_target(
        &self,
        principal: PrincipalId,
        url: &str,
        interval_seconds: u64,
    ) -> Result<Target, StoreError> {
        let mut inner = self.inner.write().await;
        let partition = inner.state.principals.entry(principal).or_default();

        if partition.targets.iter().any(|t| t.url == url) {
            return Err(StoreError::DuplicateTarget(url.to_string()));
        }

        let target = Target::new(url, interval_seconds);
        partition.history.insert(target.id, TargetHistory::default());
        partition.targets.push(target.clone());

        self.persist(&mut inner);
        debug!("Added target {} ({}) for admin {}", target.id, target.url, principal);
        Ok(target)
    }

    async fn remove_target(&self, principal: PrincipalId, id: Uuid) -> Result<Target, StoreError> {
        let mut inner = self.inner.write().await;
        let partition =
            inner.state.principals.get_mut(&principal).ok_or(StoreError::NotFound(id))?;

        let index =
            partition.targets.iter().position(|t| t.id == id).ok_or(StoreError::NotFound(id))?;
        let target = partition.targets.remove(index);
        partition.history.remove(&id);

        self.persist(&mut inner);
        debug!("Removed target {} ({}) for admin {}", target.id, target.url, principal);
        Ok(target)
    }

    async fn get_target(&self, principal: PrincipalId, id: Uuid) -> Option<Target> {
        let inner = self.inner.read().await;
        inner
            .state
            .principals
            .get(&principal)
            .and_then(|p| p.targets.iter().find(|t| t.id == id))
            .cloned()
    }

    async fn list_targets(&self, principal: PrincipalId) -> Vec<Target> {
        let inner = self.inner.read().await;
        inner.state.principals.get(&principal).map(|p| p.targets.clone()).unwrap_or_default()
    }

    async fn all_targets(&self) -> Vec<(PrincipalId, Target)> {
        let inner = self.inner.read().await;
        inner
            .state
            .principals
            .iter()
            .flat_map(|(principal, p)| p.targets.iter().map(|t| (*principal, t.clone())))
            .collect()
    }

    async fn update_status(
        &self,
        principal: PrincipalId,
        id: Uuid,
        status: TargetStatus,
        consecutive_failures: u32,
        consecutive_successes: u32,
        checked_at: SystemTime,
        status_changed_at: Option<SystemTime>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let target = partition_target_mut(inner.state.principals.get_mut(&principal), id)?;

        target.status = status;
        target.consecutive_failures = consecutive_failures;
        target.consecutive_successes = consecutive_successes;
        target.last_checked = Some(checked_at);
        if let Some(changed_at) = status_changed_at {
            target.last_status_change = Some(changed_at);
        }

        self.persist(&mut inner);
        Ok(())
    }

    async fn set_interval(
        &self,
        principal: PrincipalId,
        id: Uuid,
        interval_seconds: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let target = partition_target_mut(inner.state.principals.get_mut(&principal), id)?;
        target.interval_seconds = interval_seconds;

        self.persist(&mut inner);
        Ok(())
    }

    async fn append_record(
        &self,
        principal: PrincipalId,
        id: Uuid,
        record: HistoryRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let history = partition_history_mut(inner.state.principals.get_mut(&principal), id)?;

        history.records.push_back(record);
        Self::evict(history, &self.limits);

        self.persist(&mut inner);
        Ok(())
    }

    async fn recent_records(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, StoreError> {
        let inner = self.inner.read().await;
        let partition = inner.state.principals.get(&principal).ok_or(StoreError::NotFound(id))?;
        if !partition.targets.iter().any(|t| t.id == id) {
            return Err(StoreError::NotFound(id));
        }

        Ok(partition
            .history
            .get(&id)
            .map(|h| h.records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn uptime_ratio(
        &self,
        principal: PrincipalId,
        id: Uuid,
        window: Duration,
    ) -> Result<Option<f64>, StoreError> {
        let inner = self.inner.read().await;
        let partition = inner.state.principals.get(&principal).ok_or(StoreError::NotFound(id))?;
        if !partition.targets.iter().any(|t| t.id == id) {
            return Err(StoreError::NotFound(id));
        }

        let cutoff = SystemTime::now().checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);
        let (mut total, mut up) = (0u64, 0u64);
        if let Some(history) = partition.history.get(&id) {
            for record in history.records.iter().filter(|r| r.timestamp >= cutoff) {
                total += 1;
                if record.success {
                    up += 1;
                }
            }
        }

        if total == 0 { Ok(None) } else { Ok(Some(up as f64 / total as f64)) }
    }

    async fn open_incident(
        &self,
        principal: PrincipalId,
        id: Uuid,
        started_at: SystemTime,
        trigger: Option<String>,
    ) -> Result<Incident, StoreError> {
        let mut inner = self.inner.write().await;
        let history = partition_history_mut(inner.state.principals.get_mut(&principal), id)?;

        // At most one open incident per target
        if let Some(existing) = history.incidents.iter().find(|i| i.is_open()) {
            warn!("Target {} already has an open incident {}; not opening another", id, existing.id);
            return Ok(existing.clone());
        }

        let incident = Incident::open(id, started_at, trigger);
        history.incidents.push(incident.clone());

        self.persist(&mut inner);
        Ok(incident)
    }

    async fn close_incident(
        &self,
        principal: PrincipalId,
        id: Uuid,
        ended_at: SystemTime,
        resolution: Option<String>,
    ) -> Result<Option<Incident>, StoreError> {
        let mut inner = self.inner.write().await;
        let history = partition_history_mut(inner.state.principals.get_mut(&principal), id)?;

        let Some(incident) = history.incidents.iter_mut().find(|i| i.is_open()) else {
            return Ok(None);
        };
        incident.ended_at = Some(ended_at);
        incident.resolution = resolution;
        let closed = incident.clone();

        self.persist(&mut inner);
        Ok(Some(closed))
    }

    async fn incidents(
        &self,
        principal: PrincipalId,
        id: Uuid,
        limit: usize,
    ) -> Result<Vec<Incident>, StoreError> {
        let inner = self.inner.read().await;
        let partition = inner.state.principals.get(&principal).ok_or(StoreError::NotFound(id))?;
        if !partition.targets.iter().any(|t| t.id == id) {
            return Err(StoreError::NotFound(id));
        }

        Ok(partition
            .history
            .get(&id)
            .map(|h| h.incidents.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn flush(&self) {
        let mut inner = self.inner.write().await;
        self.persist(&mut inner);
    }
}

#[async_trait]
impl IntervalSource for FileStore {
    async fn current_interval(&self, id: Uuid) -> Option<Duration> {
        let inner = self.inner.read().await;
        inner
            .state
            .principals
            .values()
            .flat_map(|p| p.targets.iter())
            .find(|t| t.id == id)
            .map(|t| Duration::from_secs(t.interval_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::ProbeOutcome;
    use tempfile::tempdir;

    fn record_at(id: Uuid, timestamp: SystemTime, success: bool) -> HistoryRecord {
        let mut record =
            HistoryRecord::from_outcome(id, &ProbeOutcome::new().success(5, Some(200)));
        record.timestamp = timestamp;
        record.success = success;
        record
    }

    #[tokio::test]
    async fn test_duplicate_url_rejected_within_partition_only() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        store.add_target(1, "https://example.com", 60).await.unwrap();

        // Same url under a different admin is a different target
        store.add_target(2, "https://example.com", 60).await.unwrap();

        let err = store.add_target(1, "https://example.com", 60).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTarget(_)));
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let mine = store.add_target(1, "https://example.com", 60).await.unwrap();

        assert!(store.get_target(2, mine.id).await.is_none());
        assert!(store.list_targets(2).await.is_empty());
        assert!(matches!(
            store.remove_target(2, mine.id).await,
            Err(StoreError::NotFound(_))
        ));
        // Still present for its owner
        assert!(store.get_target(1, mine.id).await.is_some());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        for url in ["https://a.example", "https://b.example", "https://c.example"] {
            store.add_target(1, url, 60).await.unwrap();
        }

        let urls: Vec<String> =
            store.list_targets(1).await.into_iter().map(|t| t.url).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example", "https://c.example"]);
    }

    #[tokio::test]
    async fn test_state_survives_reload_with_counters_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStore::load(&path, RetentionLimits::default());
        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        store
            .update_status(1, target.id, TargetStatus::Down, 3, 0, SystemTime::now(), Some(SystemTime::now()))
            .await
            .unwrap();

        let reloaded = FileStore::load(&path, RetentionLimits::default());
        let loaded = reloaded.get_target(1, target.id).await.unwrap();

        assert_eq!(loaded.url, "https://example.com");
        assert_eq!(loaded.status, TargetStatus::Down);
        // Debounce counters never survive a restart
        assert_eq!(loaded.consecutive_failures, 0);
        assert_eq!(loaded.consecutive_successes, 0);
    }

    #[tokio::test]
    async fn test_corrupt_state_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{ not json at all").unwrap();

        let store = FileStore::load(&path, RetentionLimits::default());
        assert!(store.all_targets().await.is_empty());

        // And the store is usable afterwards
        store.add_target(1, "https://example.com", 60).await.unwrap();
        assert_eq!(store.list_targets(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_path_degrades_but_keeps_mutation() {
        let dir = tempdir().unwrap();
        // Parent directory does not exist, so every save fails
        let path = dir.path().join("missing").join("state.json");

        let store = FileStore::load(&path, RetentionLimits::default());
        let target = store.add_target(1, "https://example.com", 60).await.unwrap();

        assert!(store.is_degraded().await);
        assert!(store.get_target(1, target.id).await.is_some());
    }

    #[tokio::test]
    async fn test_count_eviction_is_oldest_first() {
        let dir = tempdir().unwrap();
        let limits = RetentionLimits { max_records: 5, ..RetentionLimits::default() };
        let store = FileStore::load(dir.path().join("state.json"), limits);

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        let base = SystemTime::now() - Duration::from_secs(100);
        for i in 0..10u64 {
            let ts = base + Duration::from_secs(i);
            store.append_record(1, target.id, record_at(target.id, ts, true)).await.unwrap();
        }

        let recent = store.recent_records(1, target.id, 10).await.unwrap();
        assert_eq!(recent.len(), 5);

        // Monotonic eviction: everything kept is newer than everything evicted
        let oldest_kept = recent.iter().map(|r| r.timestamp).min().unwrap();
        assert_eq!(oldest_kept, base + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_age_eviction_drops_stale_records() {
        let dir = tempdir().unwrap();
        let limits = RetentionLimits {
            max_records: 100,
            max_record_age: Duration::from_secs(3600),
        };
        let store = FileStore::load(dir.path().join("state.json"), limits);

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        let stale = SystemTime::now() - Duration::from_secs(7200);
        store.append_record(1, target.id, record_at(target.id, stale, true)).await.unwrap();
        store
            .append_record(1, target.id, record_at(target.id, SystemTime::now(), true))
            .await
            .unwrap();

        let recent = store.recent_records(1, target.id, 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert!(recent[0].timestamp > stale);
    }

    #[tokio::test]
    async fn test_recent_records_most_recent_first() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        let base = SystemTime::now() - Duration::from_secs(100);
        for i in 0..4u64 {
            let ts = base + Duration::from_secs(i);
            store.append_record(1, target.id, record_at(target.id, ts, true)).await.unwrap();
        }

        let recent = store.recent_records(1, target.id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].timestamp > recent[1].timestamp);
    }

    #[tokio::test]
    async fn test_uptime_ratio_over_window() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        let now = SystemTime::now();
        for (age_secs, success) in [(30u64, true), (20, true), (10, false)] {
            store
                .append_record(
                    1,
                    target.id,
                    record_at(target.id, now - Duration::from_secs(age_secs), success),
                )
                .await
                .unwrap();
        }

        let ratio = store
            .uptime_ratio(1, target.id, Duration::from_secs(3600))
            .await
            .unwrap()
            .unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < f64::EPSILON);

        // No samples inside a tiny window
        let empty = store.uptime_ratio(1, target.id, Duration::from_secs(1)).await.unwrap();
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn test_incident_open_close_well_nested() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        let started = SystemTime::now() - Duration::from_secs(60);

        let opened =
            store.open_incident(1, target.id, started, Some("timeout".into())).await.unwrap();

        // A second open is refused and returns the existing incident
        let again = store.open_incident(1, target.id, SystemTime::now(), None).await.unwrap();
        assert_eq!(again.id, opened.id);

        let ended = SystemTime::now();
        let closed = store
            .close_incident(1, target.id, ended, Some("status 200".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.started_at, started);
        assert_eq!(closed.ended_at, Some(ended));

        // Nothing left open
        assert!(store.close_incident(1, target.id, SystemTime::now(), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_removing_target_drops_its_history() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        store
            .append_record(1, target.id, record_at(target.id, SystemTime::now(), true))
            .await
            .unwrap();

        store.remove_target(1, target.id).await.unwrap();

        assert!(matches!(
            store.recent_records(1, target.id, 10).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store
                .append_record(1, target.id, record_at(target.id, SystemTime::now(), true))
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_interval_source_tracks_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(dir.path().join("state.json"), RetentionLimits::default());

        let target = store.add_target(1, "https://example.com", 60).await.unwrap();
        assert_eq!(
            store.current_interval(target.id).await,
            Some(Duration::from_secs(60))
        );

        store.set_interval(1, target.id, 120).await.unwrap();
        assert_eq!(
            store.current_interval(target.id).await,
            Some(Duration::from_secs(120))
        );

        store.remove_target(1, target.id).await.unwrap();
        assert_eq!(store.current_interval(target.id).await, None);
    }
}
