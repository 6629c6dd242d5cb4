use std::fmt;

/// Identifies one tracked session. Allocated in increasing order by `AppState`;
/// responses carrying an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque identifier assigned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_STATUS_MESSAGE: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Queued,
    Generating,
    /// `result_path` is `None` when the service reported completion without a
    /// result, which is a malformed terminal response.
    Completed { result_path: Option<String> },
    Failed,
    /// A status string outside the known set, kept verbatim for diagnostics.
    Unsupported(String),
}

impl TaskStatus {
    /// Parses the wire status string into the closed set of statuses.
    pub fn parse(status: &str, result_path: Option<String>) -> Self {
        match status {
            "queued" => TaskStatus::Queued,
            "generating" => TaskStatus::Generating,
            "completed" => TaskStatus::Completed {
                result_path: result_path.filter(|path| !path.is_empty()),
            },
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Unsupported(other.to_string()),
        }
    }
}

/// One status report for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: TaskStatus,
    pub progress: u8,
    pub message: String,
}

impl StatusSnapshot {
    /// Builds a snapshot from loosely typed wire values: missing progress is 0,
    /// out-of-range progress is clamped, missing message becomes
    /// [`DEFAULT_STATUS_MESSAGE`].
    pub fn from_wire(
        status: &str,
        progress: Option<i64>,
        message: Option<String>,
        result_path: Option<String>,
    ) -> Self {
        let progress = progress.unwrap_or(0).clamp(0, 100) as u8;
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_MESSAGE.to_string());
        Self {
            status: TaskStatus::parse(status, result_path),
            progress,
            message,
        }
    }
}

/// Startup classification of the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReadiness {
    Ready,
    Misconfigured { message: String },
    Offline,
}

impl ServiceReadiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, ServiceReadiness::Ready)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ServiceReadiness::Ready => None,
            ServiceReadiness::Misconfigured { message } => Some(message),
            ServiceReadiness::Offline => Some("Backend unavailable"),
        }
    }
}

/// Textual explanation produced for a `.json` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub topic: String,
    pub explanation: String,
}
