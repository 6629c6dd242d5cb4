use crate::{Phase, RenderTarget, ServiceReadiness, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub readiness: Option<ServiceReadiness>,
    pub selection: String,
    pub query: Option<String>,
    pub task_id: Option<TaskId>,
    pub progress: u8,
    pub message: String,
    pub presentation: Option<RenderTarget>,
    /// Blocking acknowledgement text, if a failure is pending.
    pub notice: Option<String>,
    pub awaiting_explanation: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// Nothing in flight: no submission, no polling, no explanation fetch.
    pub fn is_settled(&self) -> bool {
        !self.phase.is_active() && !self.awaiting_explanation
    }
}
