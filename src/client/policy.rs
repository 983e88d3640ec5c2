use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Internal decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Why an attempt did not produce a terminal answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptFailure {
    /// The node could not be reached or did not answer in time.
    Transport {
        /// Every candidate node has now been tried in this rotation.
        rotation_complete: bool,
    },
    /// The node answered with a transient precheck status.
    RetryableStatus,
}

/// Attempt budget and backoff bounds for one execution.
///
/// Retries are sequential: one node at a time, never fanned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = min;
        self.max_backoff = max.max(min);
        self
    }

    /// Exponential backoff: `min_backoff * 2^attempt`, capped at `max_backoff`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Decide what to do after attempt `attempt` (0-based) failed.
    ///
    /// A transport failure moves straight on to the next node; the engine only
    /// waits once every candidate has failed in the current rotation.
    pub(crate) fn decide(&self, failure: AttemptFailure, attempt: u32, rotation: u32) -> Decision {
        if attempt.saturating_add(1) >= self.max_attempts {
            return Decision::Fail;
        }

        let delay = match failure {
            AttemptFailure::Transport {
                rotation_complete: false,
            } => Duration::ZERO,
            AttemptFailure::Transport {
                rotation_complete: true,
            } => self.backoff_delay(rotation),
            AttemptFailure::RetryableStatus => self.backoff_delay(attempt),
        };
        Decision::Retry { delay }
    }
}
