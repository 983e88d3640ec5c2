use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct NodeHealthSnapshot {
    pub failure_threshold: u32,
    pub cooldown_ms: u64,
    pub consecutive_failures: u32,
    /// Remaining time in ms before the node is tried again, if it is currently excluded.
    pub unhealthy_remaining_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NodeHealthConfig {
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

impl Default for NodeHealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown: Duration::from_secs(30),
        }
    }
}

impl NodeHealthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

#[derive(Debug)]
struct State {
    consecutive_failures: u32,
    unhealthy_until: Option<Instant>,
}

/// Per-node breaker fed by transport failures.
///
/// - Counts consecutive transport failures
/// - Excludes the node from selection for a cooldown after the threshold
/// - Any successful round-trip resets it
///
/// Precheck rejections are not transport failures: a node answering `BUSY` is
/// reachable and keeps its health.
#[derive(Debug)]
pub struct NodeHealth {
    cfg: NodeHealthConfig,
    state: Mutex<State>,
}

impl NodeHealth {
    pub fn new(cfg: NodeHealthConfig) -> Self {
        Self {
            cfg,
            state: Mutex::new(State {
                consecutive_failures: 0,
                unhealthy_until: None,
            }),
        }
    }

    pub fn is_healthy(&self) -> bool {
        let Ok(mut st) = self.state.lock() else {
            return true;
        };
        if let Some(until) = st.unhealthy_until {
            if Instant::now() < until {
                return false;
            }
            // cooldown expired
            st.unhealthy_until = None;
            st.consecutive_failures = 0;
        }
        true
    }

    pub fn on_success(&self) {
        if let Ok(mut st) = self.state.lock() {
            st.consecutive_failures = 0;
            st.unhealthy_until = None;
        }
    }

    pub fn on_failure(&self) {
        if let Ok(mut st) = self.state.lock() {
            st.consecutive_failures = st.consecutive_failures.saturating_add(1);
            if st.consecutive_failures >= self.cfg.failure_threshold {
                st.unhealthy_until = Some(Instant::now() + self.cfg.cooldown);
            }
        }
    }

    pub fn snapshot(&self) -> NodeHealthSnapshot {
        let now = Instant::now();
        let (consecutive_failures, unhealthy_remaining_ms) = match self.state.lock() {
            Ok(st) => (
                st.consecutive_failures,
                st.unhealthy_until
                    .filter(|until| *until > now)
                    .map(|until| (until - now).as_millis() as u64),
            ),
            Err(_) => (0, None),
        };
        NodeHealthSnapshot {
            failure_threshold: self.cfg.failure_threshold,
            cooldown_ms: self.cfg.cooldown.as_millis() as u64,
            consecutive_failures,
            unhealthy_remaining_ms,
        }
    }
}
