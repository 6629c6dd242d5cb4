use crate::route::{classify_result, ResultKind};
use crate::view_model::AppViewModel;
use crate::{
    normalize_selection, GenerationOptions, RenderTarget, ServiceEndpoints, ServiceReadiness,
    SessionToken, StatusSnapshot, TaskError, TaskId,
};

pub const SUBMITTING_MESSAGE: &str = "Initializing video generation...";

/// Lifecycle phase of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl Phase {
    /// Submitting or polling: a session the coordinator is still tracking.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Polling)
    }
}

/// The single task slot. Only `update` writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSession {
    pub token: SessionToken,
    pub query: String,
    pub options: GenerationOptions,
    pub task_id: Option<TaskId>,
    pub progress: u8,
    pub message: String,
    pub result_path: Option<String>,
}

/// A completed task, as recorded in the result history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTaskSnapshot {
    pub query: String,
    pub result_path: String,
    pub kind: ResultKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    endpoints: ServiceEndpoints,
    readiness: Option<ServiceReadiness>,
    selection: String,
    last_token: SessionToken,
    phase: Phase,
    session: Option<TaskSession>,
    awaiting_explanation: bool,
    presentation: Option<RenderTarget>,
    notice: Option<TaskError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoints(endpoints: ServiceEndpoints) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let session = self.session.as_ref();
        AppViewModel {
            phase: self.phase,
            readiness: self.readiness.clone(),
            selection: self.selection.clone(),
            query: session.map(|s| s.query.clone()),
            task_id: session.and_then(|s| s.task_id.clone()),
            progress: session.map_or(0, |s| s.progress),
            message: session.map(|s| s.message.clone()).unwrap_or_default(),
            presentation: self.presentation.clone(),
            notice: self.notice.as_ref().map(TaskError::user_message),
            awaiting_explanation: self.awaiting_explanation,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&TaskSession> {
        self.session.as_ref()
    }

    pub fn notice(&self) -> Option<&TaskError> {
        self.notice.as_ref()
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    pub fn completed_task_snapshot(&self) -> Option<CompletedTaskSnapshot> {
        if self.phase != Phase::Completed {
            return None;
        }
        let session = self.session.as_ref()?;
        let result_path = session.result_path.clone()?;
        let kind = classify_result(&result_path)?;
        Some(CompletedTaskSnapshot {
            query: session.query.clone(),
            result_path,
            kind,
        })
    }

    pub(crate) fn selection(&self) -> &str {
        &self.selection
    }

    /// True when `token` names the current session and it is in `phase`.
    pub(crate) fn accepts(&self, token: SessionToken, phase: Phase) -> bool {
        self.phase == phase && self.current_token() == Some(token)
    }

    pub(crate) fn current_token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|s| s.token)
    }

    pub(crate) fn active_token(&self) -> Option<SessionToken> {
        if self.phase.is_active() {
            self.current_token()
        } else {
            None
        }
    }

    pub(crate) fn is_awaiting_explanation(&self) -> bool {
        self.awaiting_explanation
    }

    pub(crate) fn set_readiness(&mut self, readiness: ServiceReadiness) {
        self.readiness = Some(readiness);
        self.dirty = true;
    }

    pub(crate) fn set_selection(&mut self, raw: &str) {
        let normalized = normalize_selection(raw);
        if normalized != self.selection {
            self.selection = normalized;
            self.dirty = true;
        }
    }

    /// Replaces the task slot with a fresh session and returns a copy of it.
    /// The selection is consumed by the new session.
    pub(crate) fn begin_session(&mut self, options: GenerationOptions) -> TaskSession {
        self.last_token = self.last_token.next();
        let session = TaskSession {
            token: self.last_token,
            query: std::mem::take(&mut self.selection),
            options,
            task_id: None,
            progress: 0,
            message: SUBMITTING_MESSAGE.to_string(),
            result_path: None,
        };
        self.session = Some(session.clone());
        self.phase = Phase::Submitting;
        self.awaiting_explanation = false;
        self.presentation = None;
        self.notice = None;
        self.dirty = true;
        session
    }

    pub(crate) fn enter_polling(&mut self, task_id: TaskId) {
        if let Some(session) = self.session.as_mut() {
            session.task_id = Some(task_id);
            session.progress = 0;
        }
        self.phase = Phase::Polling;
        self.dirty = true;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        if let Some(session) = self.session.as_mut() {
            session.progress = snapshot.progress;
            session.message = snapshot.message.clone();
        }
        self.dirty = true;
    }

    pub(crate) fn task_id(&self) -> Option<TaskId> {
        self.session.as_ref().and_then(|s| s.task_id.clone())
    }

    pub(crate) fn query(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.query.as_str())
    }

    pub(crate) fn complete(&mut self, result_path: &str) {
        if let Some(session) = self.session.as_mut() {
            session.result_path = Some(result_path.to_string());
        }
        self.phase = Phase::Completed;
        self.dirty = true;
    }

    pub(crate) fn await_explanation(&mut self) {
        self.awaiting_explanation = true;
        self.dirty = true;
    }

    pub(crate) fn present(&mut self, target: RenderTarget) {
        self.awaiting_explanation = false;
        self.presentation = Some(target);
        self.dirty = true;
    }

    /// Records a failure notice. A failed explanation load leaves the phase at
    /// `Completed`; every other error ends the session as `Failed`.
    pub(crate) fn fail(&mut self, error: TaskError) {
        if !matches!(error, TaskError::ExplanationLoadFailed(_)) {
            self.phase = Phase::Failed;
        }
        self.awaiting_explanation = false;
        self.notice = Some(error);
        self.dirty = true;
    }

    pub(crate) fn cancel(&mut self) {
        self.phase = Phase::Cancelled;
        self.awaiting_explanation = false;
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn clear_presentation(&mut self) {
        if self.presentation.take().is_some() {
            self.dirty = true;
        }
    }
}
