use std::time::Duration;

use visualizer_core::{
    Effect, Explanation, GenerationOptions, Msg, ServiceReadiness, SessionToken, StatusSnapshot,
    TaskId,
};

/// Failure of one request/response exchange with the generation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("bad response: http status {status}")]
    BadResponse { status: u16 },
    #[error("invalid response body: {0}")]
    InvalidBody(String),
    #[error("invalid url {0:?}")]
    InvalidUrl(String),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CheckReadiness,
    Submit {
        token: SessionToken,
        query: String,
        options: GenerationOptions,
    },
    FetchStatus {
        token: SessionToken,
        task_id: TaskId,
        delay: Duration,
    },
    StopPolling {
        token: SessionToken,
    },
    LoadExplanation {
        token: SessionToken,
        url: String,
    },
}

impl From<Effect> for EngineCommand {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::CheckReadiness => EngineCommand::CheckReadiness,
            Effect::Submit {
                token,
                query,
                options,
            } => EngineCommand::Submit {
                token,
                query,
                options,
            },
            Effect::FetchStatus {
                token,
                task_id,
                delay,
            } => EngineCommand::FetchStatus {
                token,
                task_id,
                delay,
            },
            Effect::StopPolling { token } => EngineCommand::StopPolling { token },
            Effect::LoadExplanation { token, url } => EngineCommand::LoadExplanation { token, url },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ReadinessChecked(ServiceReadiness),
    Submitted {
        token: SessionToken,
        result: Result<TaskId, ClientError>,
    },
    StatusFetched {
        token: SessionToken,
        result: Result<StatusSnapshot, ClientError>,
    },
    ExplanationLoaded {
        token: SessionToken,
        result: Result<Explanation, ClientError>,
    },
}

impl From<EngineEvent> for Msg {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::ReadinessChecked(readiness) => Msg::ReadinessChecked(readiness),
            EngineEvent::Submitted { token, result } => Msg::Submitted {
                token,
                result: result.map_err(|err| err.to_string()),
            },
            EngineEvent::StatusFetched { token, result } => Msg::StatusFetched {
                token,
                result: result.map_err(|err| err.to_string()),
            },
            EngineEvent::ExplanationLoaded { token, result } => Msg::ExplanationLoaded {
                token,
                result: result.map_err(|err| err.to_string()),
            },
        }
    }
}
