//! Retry policy for page queries
//!
//! A [`RetryPolicy`] decides which errors are worth retrying, how long to wait
//! between attempts and whether to ever give up. Page fetches use
//! [`RetryPolicy::forever`]: transient failures are retried until the query
//! succeeds, fatal ones surface immediately.

use crate::config::schema::RetryConfig;
use crate::domain::{DumpError, Result};
use std::future::Future;
use std::time::Duration;

/// Predicate deciding whether an error is retryable
pub type Classifier = fn(&DumpError) -> bool;

/// Retry policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retry without an attempt limit
    pub forever: bool,

    /// Maximum retries when `forever` is off
    pub max_retries: usize,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for a single delay
    pub max_delay: Duration,

    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,

    classifier: Classifier,
}

impl RetryPolicy {
    /// Retry transient errors indefinitely with exponential backoff
    pub fn forever() -> Self {
        Self {
            forever: true,
            ..Self::default()
        }
    }

    /// Never retry
    pub fn none() -> Self {
        Self {
            forever: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Build a policy from the `[database.retry]` configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            forever: config.forever,
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            classifier: DumpError::is_transient,
        }
    }

    /// Replace the classification predicate
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set both delays
    pub fn with_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_delay = initial;
        self.max_delay = max;
        self
    }

    /// Whether `error` should be retried by this policy
    pub fn is_retryable(&self, error: &DumpError) -> bool {
        (self.classifier)(error)
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
        let delay_ms = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = delay_ms.min(self.max_delay.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    fn exhausted(&self, attempt: usize) -> bool {
        !self.forever && attempt > self.max_retries
    }

    /// Run `operation` until it succeeds, fails fatally, or retries run out
    ///
    /// `on_failure` observes every failed attempt that will be retried, with
    /// the 1-based attempt number and the delay before the next try. It
    /// cannot stop the loop.
    pub async fn run<T, F, Fut, O>(&self, mut operation: F, mut on_failure: O) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        O: FnMut(usize, &DumpError, Duration),
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if !self.is_retryable(&e) || self.exhausted(attempt) {
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    on_failure(attempt, &e, delay);

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
