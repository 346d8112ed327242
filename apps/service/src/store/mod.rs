/// Durable target catalog and history ledger
///
/// This module owns everything that survives a restart: monitored targets
/// partitioned per admin, their bounded probe history, and incident records.
/// Persistence is a full-document JSON write behind an atomic rename.
pub mod models;
pub mod repository;

pub use models::{HistoryRecord, Incident, PrincipalId, Target};
pub use repository::{FileStore, RetentionLimits, Store, StoreError};
