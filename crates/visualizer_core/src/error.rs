use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "Unknown error occurred during generation";

/// Why a task's lifecycle ended without a presentable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
    #[error("status fetch failed: {0}")]
    StatusFetchFailed(String),
    #[error("service reported failure: {0}")]
    ServiceReportedFailure(String),
    #[error("unrecognised task status {0:?}")]
    UnknownStatus(String),
    #[error("task completed without a result path")]
    MalformedTerminalResponse,
    #[error("explanation could not be loaded: {0}")]
    ExplanationLoadFailed(String),
    #[error("unsupported result type for {0:?}")]
    UnsupportedResultType(String),
}

impl TaskError {
    /// Text for the blocking acknowledgement shown to the user. Fetch errors
    /// and unknown statuses share one generic message.
    pub fn user_message(&self) -> String {
        match self {
            TaskError::SubmissionFailed(_) => {
                "Failed to start video generation. Please make sure the backend is running."
                    .to_string()
            }
            TaskError::StatusFetchFailed(_) | TaskError::UnknownStatus(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            TaskError::ServiceReportedFailure(message) => format!("Generation failed: {message}"),
            TaskError::MalformedTerminalResponse => {
                "Generation finished without a result (internal error)".to_string()
            }
            TaskError::ExplanationLoadFailed(_) => "Error loading explanation".to_string(),
            TaskError::UnsupportedResultType(path) => {
                format!("Generation finished with an unsupported result: {path}")
            }
        }
    }
}
