use crate::domain::model::AttemptOutcome;
use crate::domain::ports::{Attempt, Sleeper};
use crate::utils::error::{BookingError, Result};
use crate::utils::monitor::SystemMonitor;
use std::time::Duration;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub attempts: u32,
    pub outcome: AttemptOutcome,
}

/// Runs attempts back to back, sleeping between unsuccessful ones.
///
/// Attempts never overlap: the next one starts only after the previous one
/// returned. Errors are fatal and end the loop right away.
pub struct RetryLoop<'s, A: Attempt, S: Sleeper> {
    attempt: A,
    sleeper: &'s S,
    interval: Duration,
    max_attempts: Option<u32>,
    monitor: SystemMonitor,
}

impl<'s, A: Attempt, S: Sleeper> RetryLoop<'s, A, S> {
    pub fn new(attempt: A, sleeper: &'s S, interval: Duration) -> Self {
        Self::new_with_monitoring(attempt, sleeper, interval, false)
    }

    pub fn new_with_monitoring(
        attempt: A,
        sleeper: &'s S,
        interval: Duration,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            attempt,
            sleeper,
            interval,
            max_attempts: None,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub async fn run(&self) -> Result<RetryReport> {
        let mut number = 0u32;

        loop {
            number += 1;
            let outcome = self.attempt.run(number).await;
            self.monitor.log_attempt_stats(number);
            let outcome = outcome?;

            if outcome.is_success() {
                tracing::info!("✅ Attempt #{}: {}", number, outcome);
                self.monitor.log_final_stats(number);
                return Ok(RetryReport {
                    attempts: number,
                    outcome,
                });
            }

            if self.max_attempts.is_some_and(|max| number >= max) {
                tracing::warn!("🛑 Attempt #{}: {}, no attempts left", number, outcome);
                return Err(BookingError::AttemptsExhausted { attempts: number });
            }

            tracing::info!(
                "🔄 Attempt #{}: {}, waiting {} seconds",
                number,
                outcome,
                self.interval.as_secs()
            );
            self.sleeper.sleep(self.interval).await;
        }
    }
}
