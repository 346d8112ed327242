use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Live status of a monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Up,
    Down,
    Unknown,
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetStatus::Up => write!(f, "up"),
            TargetStatus::Down => write!(f, "down"),
            TargetStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classification of a failed probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeErrorKind {
    Timeout,
    ConnectionRefused,
    DnsFailure,
    BadStatus,
    RedirectLoop,
}

impl std::fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeErrorKind::Timeout => write!(f, "timeout"),
            ProbeErrorKind::ConnectionRefused => write!(f, "connection-refused"),
            ProbeErrorKind::DnsFailure => write!(f, "dns-failure"),
            ProbeErrorKind::BadStatus => write!(f, "bad-status"),
            ProbeErrorKind::RedirectLoop => write!(f, "redirect-loop"),
        }
    }
}

/// Result of a single health-check attempt against one URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether the response landed in the accepted status range
    pub success: bool,

    /// HTTP status code, when a response was received at all
    pub status_code: Option<u16>,

    /// Round-trip time in milliseconds, measured even for failures
    pub latency_ms: u64,

    /// Failure classification; `None` on success
    pub error: Option<ProbeErrorKind>,

    /// Human-readable failure detail
    pub error_message: Option<String>,

    /// When the probe was issued
    pub timestamp: SystemTime,
}

impl ProbeOutcome {
    pub fn new() -> Self {
        Self {
            success: false,
            status_code: None,
            latency_ms: 0,
            error: None,
            error_message: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Mark the probe as successful
    pub fn success(mut self, latency_ms: u64, status_code: Option<u16>) -> Self {
        self.success = true;
        self.latency_ms = latency_ms;
        self.status_code = status_code;
        self
    }

    /// Mark the probe as failed with a classification
    pub fn failure(mut self, kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(kind);
        self.error_message = Some(message.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

impl Default for ProbeOutcome {
    fn default() -> Self {
        Self::new()
    }
}

/// A confirmed status change produced by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentDown,
    WentUp,
}
