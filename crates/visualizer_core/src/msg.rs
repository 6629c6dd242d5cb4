use crate::{Explanation, GenerationOptions, ServiceReadiness, SessionToken, StatusSnapshot, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front end is up; run the one-off readiness check.
    Started,
    /// Result of the readiness check.
    ReadinessChecked(ServiceReadiness),
    /// Raw text from a selection event.
    SelectionChanged(String),
    /// User asked to visualize the current selection.
    VisualizeRequested(GenerationOptions),
    /// User cancelled the tracked task.
    CancelClicked,
    /// Engine finished the submit request for a session.
    Submitted {
        token: SessionToken,
        result: Result<TaskId, String>,
    },
    /// Engine finished one status fetch for a session.
    StatusFetched {
        token: SessionToken,
        result: Result<StatusSnapshot, String>,
    },
    /// Engine finished the secondary explanation fetch.
    ExplanationLoaded {
        token: SessionToken,
        result: Result<Explanation, String>,
    },
    /// User acknowledged the failure notice.
    NoticeAcknowledged,
    /// User closed the video or explanation.
    PresentationClosed,
    NoOp,
}
