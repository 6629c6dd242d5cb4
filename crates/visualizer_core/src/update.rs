use std::time::Duration;

use crate::route::{route, video_title, Route};
use crate::{
    AppState, Effect, Explanation, GenerationOptions, Msg, Phase, RenderTarget, SessionToken,
    StatusSnapshot, TaskError, TaskId, TaskStatus, POLL_INTERVAL,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Engine responses are applied only if their token names the current session
/// and the session is still in the phase that expects them; anything else is a
/// late response for an abandoned or cancelled session and is dropped.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::CheckReadiness],
        Msg::ReadinessChecked(readiness) => {
            state.set_readiness(readiness);
            Vec::new()
        }
        Msg::SelectionChanged(raw) => {
            state.set_selection(&raw);
            Vec::new()
        }
        Msg::VisualizeRequested(options) => start_session(&mut state, options),
        Msg::CancelClicked => match state.active_token() {
            Some(token) => {
                state.cancel();
                vec![Effect::StopPolling { token }]
            }
            // The task finished but its explanation never arrived; the late
            // document is dropped by the phase check below.
            None if state.is_awaiting_explanation() => {
                state.cancel();
                Vec::new()
            }
            None => Vec::new(),
        },
        Msg::Submitted { token, result } => {
            if !state.accepts(token, Phase::Submitting) {
                return (state, Vec::new());
            }
            match result {
                Ok(task_id) => {
                    state.enter_polling(task_id.clone());
                    vec![Effect::FetchStatus {
                        token,
                        task_id,
                        delay: Duration::ZERO,
                    }]
                }
                Err(reason) => {
                    state.fail(TaskError::SubmissionFailed(reason));
                    Vec::new()
                }
            }
        }
        Msg::StatusFetched { token, result } => {
            if !state.accepts(token, Phase::Polling) {
                return (state, Vec::new());
            }
            match result {
                Ok(snapshot) => apply_status(&mut state, token, snapshot),
                Err(reason) => {
                    state.fail(TaskError::StatusFetchFailed(reason));
                    vec![Effect::StopPolling { token }]
                }
            }
        }
        Msg::ExplanationLoaded { token, result } => {
            if state.accepts(token, Phase::Completed) && state.is_awaiting_explanation() {
                apply_explanation(&mut state, result);
            }
            Vec::new()
        }
        Msg::NoticeAcknowledged => {
            state.clear_notice();
            Vec::new()
        }
        Msg::PresentationClosed => {
            state.clear_presentation();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_session(state: &mut AppState, options: GenerationOptions) -> Vec<Effect> {
    if state.selection().is_empty() {
        return Vec::new();
    }
    // A new visualization abandons tracking of the previous task; the service
    // is not told.
    let abandoned = state.active_token();
    let session = state.begin_session(options);

    let mut effects = Vec::with_capacity(2);
    if let Some(token) = abandoned {
        effects.push(Effect::StopPolling { token });
    }
    effects.push(Effect::Submit {
        token: session.token,
        query: session.query,
        options: session.options,
    });
    effects
}

fn apply_status(state: &mut AppState, token: SessionToken, snapshot: StatusSnapshot) -> Vec<Effect> {
    state.apply_snapshot(&snapshot);
    match snapshot.status {
        TaskStatus::Queued | TaskStatus::Generating => match state.task_id() {
            Some(task_id) => vec![poll_again(token, task_id)],
            None => {
                state.fail(TaskError::UnknownStatus("polling without task id".to_string()));
                vec![Effect::StopPolling { token }]
            }
        },
        TaskStatus::Completed {
            result_path: Some(path),
        } => complete(state, token, &path),
        TaskStatus::Completed { result_path: None } => {
            state.fail(TaskError::MalformedTerminalResponse);
            vec![Effect::StopPolling { token }]
        }
        TaskStatus::Failed => {
            state.fail(TaskError::ServiceReportedFailure(snapshot.message));
            vec![Effect::StopPolling { token }]
        }
        TaskStatus::Unsupported(raw) => {
            state.fail(TaskError::UnknownStatus(raw));
            vec![Effect::StopPolling { token }]
        }
    }
}

fn poll_again(token: SessionToken, task_id: TaskId) -> Effect {
    Effect::FetchStatus {
        token,
        task_id,
        delay: POLL_INTERVAL,
    }
}

fn complete(state: &mut AppState, token: SessionToken, result_path: &str) -> Vec<Effect> {
    match route(state.endpoints(), result_path) {
        Route::PlayVideo { url } => {
            let title = video_title(state.query());
            state.complete(result_path);
            state.present(RenderTarget::Video { url, title });
            vec![Effect::StopPolling { token }]
        }
        Route::LoadExplanation { url } => {
            state.complete(result_path);
            state.await_explanation();
            vec![
                Effect::StopPolling { token },
                Effect::LoadExplanation { token, url },
            ]
        }
        Route::Unsupported { result_path } => {
            state.fail(TaskError::UnsupportedResultType(result_path));
            vec![Effect::StopPolling { token }]
        }
    }
}

fn apply_explanation(state: &mut AppState, result: Result<Explanation, String>) {
    match result {
        Ok(Explanation { topic, explanation }) => {
            state.present(RenderTarget::Explanation { topic, explanation });
        }
        Err(reason) => state.fail(TaskError::ExplanationLoadFailed(reason)),
    }
}
