use crate::domain::model::HealthReport;
use crate::domain::ports::HealthProbe;
use crate::utils::error::{LauncherError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use tokio::time::sleep;

/// Upper bound for any single configured delay.
pub const MAX_CONFIGURED_DELAY: Duration = Duration::from_secs(10 * 60);
pub const MAX_CONFIGURED_ATTEMPTS: u32 = 100;

/// Bounded exponential backoff used while a freshly launched service boots.
///
/// The first check happens after `initial_delay`. After a failed check `n`
/// (0-based) the poller sleeps `base_delay * multiplier^n`, capped at
/// `max_delay`. At most `max_attempts` checks are made.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessPolicy {
    pub initial_delay: Duration,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            max_attempts: 8,
        }
    }
}

impl ReadinessPolicy {
    /// A single check after a fixed sleep.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
            max_attempts: 1,
        }
    }

    /// Sleep after the `retry`-th failed check (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(i32::try_from(retry).unwrap_or(i32::MAX));
        let secs = self.base_delay.as_secs_f64() * factor;

        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// Sleeps between checks, in order. One fewer than `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|retry| self.delay_for(retry))
    }

    /// Total time spent sleeping if the service never comes up.
    pub fn total_wait(&self) -> Duration {
        self.delays()
            .fold(self.initial_delay, |acc, d| acc.saturating_add(d))
    }
}

impl Validate for ReadinessPolicy {
    fn validate(&self) -> Result<()> {
        let limit_ms = MAX_CONFIGURED_DELAY.as_millis();
        for (field, delay) in [
            ("readiness.initial_delay_ms", self.initial_delay),
            ("readiness.base_delay_ms", self.base_delay),
            ("readiness.max_delay_ms", self.max_delay),
        ] {
            validation::validate_range(field, delay.as_millis(), 0, limit_ms)?;
        }

        if self.max_delay < self.base_delay {
            return Err(LauncherError::InvalidConfigValueError {
                field: "readiness.max_delay_ms".to_string(),
                value: self.max_delay.as_millis().to_string(),
                reason: format!(
                    "Must not be below readiness.base_delay_ms ({})",
                    self.base_delay.as_millis()
                ),
            });
        }

        validation::validate_range("readiness.multiplier", self.multiplier, 1.0, 10.0)?;
        validation::validate_range(
            "readiness.max_attempts",
            self.max_attempts,
            1,
            MAX_CONFIGURED_ATTEMPTS,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Readiness {
    pub report: HealthReport,
    pub attempts: u32,
}

/// Poll `<base_url><health_path>` until it answers 200 or the policy runs out.
pub async fn wait_until_ready<H>(
    probe: &H,
    base_url: &str,
    health_path: &str,
    policy: &ReadinessPolicy,
) -> Readiness
where
    H: HealthProbe + ?Sized,
{
    sleep(policy.initial_delay).await;

    let max_attempts = policy.max_attempts.max(1);
    let mut report = HealthReport::down();

    for attempt in 1..=max_attempts {
        report = probe.probe(base_url, health_path).await;
        if report.running {
            tracing::debug!("{} ready after {} attempt(s)", base_url, attempt);
            return Readiness {
                report,
                attempts: attempt,
            };
        }

        if attempt < max_attempts {
            let delay = policy.delay_for(attempt - 1);
            tracing::debug!(
                "⏳ Waiting for {} (attempt {}/{}), retrying in {:?}",
                base_url,
                attempt,
                max_attempts,
                delay
            );
            sleep(delay).await;
        }
    }

    Readiness {
        report,
        attempts: max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProbe {
        calls: AtomicU32,
        healthy_from: u32,
    }

    #[async_trait]
    impl HealthProbe for CountingProbe {
        async fn probe(&self, _base_url: &str, _health_path: &str) -> HealthReport {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            HealthReport {
                running: call >= self.healthy_from,
                info: None,
            }
        }
    }

    fn fast_policy(max_attempts: u32) -> ReadinessPolicy {
        ReadinessPolicy {
            initial_delay: Duration::ZERO,
            base_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(4),
            max_attempts,
        }
    }

    #[test]
    fn test_delays_grow_and_cap() {
        let policy = ReadinessPolicy::default();
        let delays: Vec<_> = policy.delays().collect();

        assert_eq!(delays.len(), 7);
        assert_eq!(delays[0], Duration::from_millis(500));
        assert_eq!(delays[1], Duration::from_secs(1));
        assert_eq!(delays[2], Duration::from_secs(2));
        assert_eq!(delays[3], Duration::from_secs(4));
        assert_eq!(delays[4], Duration::from_secs(8));
        assert_eq!(delays[6], Duration::from_secs(8));
        assert_eq!(policy.total_wait(), Duration::from_millis(500 + 500 + 1000 + 2000 + 4000 + 3 * 8000));
    }

    #[test]
    fn test_huge_retry_saturates_at_max_delay() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), policy.max_delay);
    }

    #[test]
    fn test_total_wait_saturates_instead_of_overflowing() {
        let policy = ReadinessPolicy {
            initial_delay: Duration::MAX,
            base_delay: Duration::MAX,
            multiplier: 2.0,
            max_delay: Duration::MAX,
            max_attempts: 2000,
        };

        assert_eq!(policy.total_wait(), Duration::MAX);
    }

    #[test]
    fn test_policy_validation() {
        assert!(ReadinessPolicy::default().validate().is_ok());
        assert!(ReadinessPolicy::fixed(Duration::ZERO).validate().is_ok());

        let too_long = ReadinessPolicy {
            initial_delay: MAX_CONFIGURED_DELAY + Duration::from_millis(1),
            ..ReadinessPolicy::default()
        };
        assert!(too_long.validate().is_err());

        let inverted = ReadinessPolicy {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(1),
            ..ReadinessPolicy::default()
        };
        assert!(inverted.validate().is_err());

        let too_many = ReadinessPolicy {
            max_attempts: MAX_CONFIGURED_ATTEMPTS + 1,
            ..ReadinessPolicy::default()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_fixed_policy_is_single_check() {
        let policy = ReadinessPolicy::fixed(Duration::from_secs(5));
        assert_eq!(policy.delays().count(), 0);
        assert_eq!(policy.total_wait(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_wait_stops_at_first_success() {
        let probe = CountingProbe {
            calls: AtomicU32::new(0),
            healthy_from: 3,
        };

        let readiness = wait_until_ready(&probe, "http://localhost:1", "/health", &fast_policy(5)).await;

        assert!(readiness.report.running);
        assert_eq!(readiness.attempts, 3);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_gives_up_after_max_attempts() {
        let probe = CountingProbe {
            calls: AtomicU32::new(0),
            healthy_from: u32::MAX,
        };

        let readiness = wait_until_ready(&probe, "http://localhost:1", "/health", &fast_policy(4)).await;

        assert!(!readiness.report.running);
        assert_eq!(readiness.attempts, 4);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
    }
}
