use std::error::Error as StdError;
use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::redirect;

use super::types::{ProbeErrorKind, ProbeOutcome};

/// Prober trait for issuing a single health check against one target
///
/// Implementations never propagate a fault: every failure mode is folded
/// into a [`ProbeOutcome`] with `success = false` and a classification, so
/// the scheduler needs no target-specific error handling.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HTTP/HTTPS prober
pub struct HttpProber {
    client: reqwest::Client,
    accepted_status: (u16, u16),
}

impl HttpProber {
    pub fn new(
        timeout_seconds: u64,
        max_redirects: usize,
        accepted_status: (u16, u16),
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .redirect(redirect::Policy::limited(max_redirects))
            .build()?;

        Ok(Self { client, accepted_status })
    }

    fn accepts(&self, status: u16) -> bool {
        let (min, max) = self.accepted_status;
        status >= min && status <= max
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let outcome = ProbeOutcome::new();

        match self.client.get(url).send().await {
            Ok(response) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let status = response.status().as_u16();

                if self.accepts(status) {
                    outcome.success(latency_ms, Some(status))
                } else {
                    outcome
                        .failure(
                            ProbeErrorKind::BadStatus,
                            format!("unexpected status code {status}"),
                        )
                        .with_status_code(status)
                        .with_latency(latency_ms)
                }
            }
            Err(error) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let kind = classify(&error);
                outcome.failure(kind, error.to_string()).with_latency(latency_ms)
            }
        }
    }
}

/// Map a transport error onto the enumerated failure kinds
fn classify(error: &reqwest::Error) -> ProbeErrorKind {
    if error.is_timeout() {
        ProbeErrorKind::Timeout
    } else if error.is_redirect() {
        ProbeErrorKind::RedirectLoop
    } else if chain_mentions(error, "dns") {
        ProbeErrorKind::DnsFailure
    } else {
        // Everything else on the connect path surfaces as a refused
        // connection (reset, unreachable, TLS handshake failure).
        ProbeErrorKind::ConnectionRefused
    }
}

/// Walk the error source chain looking for a marker string
fn chain_mentions(error: &reqwest::Error, needle: &str) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains(needle) {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_status_range() {
        let prober = HttpProber::new(10, 10, (200, 399)).unwrap();

        assert!(prober.accepts(200));
        assert!(prober.accepts(301));
        assert!(prober.accepts(399));

        assert!(!prober.accepts(199));
        assert!(!prober.accepts(404));
        assert!(!prober.accepts(500));
    }

    #[test]
    fn test_narrow_accepted_range() {
        // Strict deployments only accept 2xx
        let prober = HttpProber::new(10, 10, (200, 299)).unwrap();

        assert!(prober.accepts(204));
        assert!(!prober.accepts(302));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_classified_not_propagated() {
        let prober = HttpProber::new(2, 10, (200, 399)).unwrap();

        let outcome = prober.probe("http://host.invalid").await;

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
        assert!(outcome.error_message.is_some());
    }
}
