use std::time::Duration;

use crate::{GenerationOptions, SessionToken, TaskId};

/// Delay between a non-terminal status snapshot and the next fetch.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckReadiness,
    Submit {
        token: SessionToken,
        query: String,
        options: GenerationOptions,
    },
    /// Fetch the task status once `delay` has elapsed.
    FetchStatus {
        token: SessionToken,
        task_id: TaskId,
        delay: Duration,
    },
    /// Revoke any scheduled or in-flight fetch for the session.
    StopPolling { token: SessionToken },
    LoadExplanation { token: SessionToken, url: String },
}
