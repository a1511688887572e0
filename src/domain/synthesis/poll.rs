use std::time::Duration;

/// Default delay between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Upper bound for the delay once backoff kicks in
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// How often and for how long a job is polled.
///
/// A `backoff_factor` of 1.0 keeps the interval fixed. `timeout = None` waits until the job
/// reaches a terminal state, however long that takes.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub backoff_factor: f64,
    pub max_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            backoff_factor: 1.0,
            max_interval: DEFAULT_MAX_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_interval: interval,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Delay to wait after the given delay, capped at `max_interval`
    pub fn next_delay(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 {
            return current;
        }
        let cap = self.max_interval.max(self.interval);
        // Out-of-range products saturate at the cap
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map(|grown| grown.min(cap))
            .unwrap_or(cap)
    }
}
