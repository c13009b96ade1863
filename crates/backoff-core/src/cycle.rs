//! Decisions a wake/connect/sleep loop makes after each connection attempt.

use crate::state::BackoffState;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    TimedOut,
}

impl ConnectOutcome {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectOutcome::Connected)
    }
}

/// What a device that sleeps between attempts does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepPlan {
    /// Connected; publish and then sleep for the normal interval.
    Publish { sleep_secs: u32 },
    /// Gave up connecting; sleep for the backoff wait.
    Backoff { sleep_secs: u32, tries: u16 },
}

impl SleepPlan {
    pub fn after_connect(
        state: &mut BackoffState<'_>,
        outcome: ConnectOutcome,
        normal_sleep_secs: u32,
    ) -> Self {
        if outcome.is_connected() {
            state.record_success();
            info!(sleep_secs = normal_sleep_secs, "connected; clearing backoff");
            SleepPlan::Publish {
                sleep_secs: normal_sleep_secs,
            }
        } else {
            let sleep_secs = state.record_failure_and_get_wait_secs();
            let tries = state.tries_count();
            info!(sleep_secs, tries, "failed to connect; backing off");
            SleepPlan::Backoff { sleep_secs, tries }
        }
    }

    pub fn sleep_secs(&self) -> u32 {
        match self {
            SleepPlan::Publish { sleep_secs } | SleepPlan::Backoff { sleep_secs, .. } => {
                *sleep_secs
            }
        }
    }
}

/// What a device that stays awake does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPlan {
    Run,
    RetryAfter(Duration),
}

impl RetryPlan {
    pub fn after_connect(state: &mut BackoffState<'_>, outcome: ConnectOutcome) -> Self {
        if outcome.is_connected() {
            state.record_success();
            RetryPlan::Run
        } else {
            let delay = state.record_failure();
            info!(retry_secs = delay.as_secs(), "failed to connect; waiting to retry");
            RetryPlan::RetryAfter(delay)
        }
    }
}
