use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use engine_logging::{engine_info, engine_warn};
use visualizer_core::{
    update, AppState, AppViewModel, GenerationOptions, Msg, Phase, ServiceEndpoints,
    ServiceReadiness,
};
use visualizer_engine::TaskClient;

use crate::effects::EffectRunner;
use crate::render::Renderer;

const PUMP_INTERVAL: Duration = Duration::from_millis(20);

/// How a `visualize` run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Cancelled,
}

/// Drives the core state machine from a terminal: messages go through
/// `update`, effects go to the engine, dirty views are rendered.
pub struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer<W>,
}

impl<W: Write> Session<W> {
    pub fn new(
        endpoints: ServiceEndpoints,
        client: Arc<dyn TaskClient>,
        out: W,
    ) -> io::Result<Self> {
        Ok(Self {
            state: AppState::with_endpoints(endpoints),
            runner: EffectRunner::new(client)?,
            renderer: Renderer::new(out),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.render(&view);
        }
    }

    /// Asks the service whether it can generate, waiting at most `timeout`.
    pub fn check_readiness(&mut self, timeout: Duration) -> ServiceReadiness {
        self.dispatch(Msg::Started);
        let deadline = Instant::now() + timeout;
        self.pump_until(Some(deadline), |view| view.readiness.is_some());
        self.state.view().readiness.unwrap_or(ServiceReadiness::Offline)
    }

    /// Submits `raw` and pumps engine events until the task settles. When
    /// `timeout` elapses first the session is cancelled.
    pub fn visualize(
        &mut self,
        raw: &str,
        options: GenerationOptions,
        timeout: Option<Duration>,
    ) -> Option<Outcome> {
        self.dispatch(Msg::SelectionChanged(raw.to_string()));
        if self.state.view().selection.is_empty() {
            engine_warn!("Selection is empty after normalization; nothing submitted");
            return None;
        }
        self.dispatch(Msg::VisualizeRequested(options));

        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        if !self.pump_until(deadline, AppViewModel::is_settled) {
            engine_info!("Session did not settle; cancelling");
            self.dispatch(Msg::CancelClicked);
        }

        match self.state.phase() {
            Phase::Completed => Some(Outcome::Completed),
            Phase::Failed => Some(Outcome::Failed),
            Phase::Cancelled => Some(Outcome::Cancelled),
            Phase::Idle | Phase::Submitting | Phase::Polling => None,
        }
    }

    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    /// Returns false when `deadline` passed or the engine stopped before
    /// `done` held.
    fn pump_until(
        &mut self,
        deadline: Option<Instant>,
        done: impl Fn(&AppViewModel) -> bool,
    ) -> bool {
        loop {
            self.drain_events();
            if done(&self.state.view()) {
                return true;
            }
            if self.runner.is_stopped() {
                return false;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return false;
            }
            thread::sleep(PUMP_INTERVAL);
        }
    }

    fn drain_events(&mut self) {
        while let Some(msg) = self.runner.try_recv() {
            self.dispatch(msg);
        }
    }

    fn render(&mut self, view: &AppViewModel) {
        if let Err(err) = self.renderer.render(view) {
            engine_warn!("Failed to write output: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use visualizer_core::{Explanation, StatusSnapshot, TaskId};
    use visualizer_engine::ClientError;

    struct InstantClient {
        result_path: &'static str,
    }

    #[async_trait]
    impl TaskClient for InstantClient {
        async fn submit(
            &self,
            _query: &str,
            _options: &GenerationOptions,
        ) -> Result<TaskId, ClientError> {
            Ok(TaskId::new("task-1"))
        }

        async fn fetch_status(&self, _task_id: &TaskId) -> Result<StatusSnapshot, ClientError> {
            Ok(StatusSnapshot::from_wire(
                "completed",
                Some(100),
                None,
                Some(self.result_path.to_string()),
            ))
        }

        async fn check_readiness(&self) -> ServiceReadiness {
            ServiceReadiness::Misconfigured {
                message: "missing key".to_string(),
            }
        }

        async fn fetch_explanation(&self, _url: &str) -> Result<Explanation, ClientError> {
            Ok(Explanation {
                topic: "Limits".to_string(),
                explanation: "Approach.".to_string(),
            })
        }
    }

    fn session(result_path: &'static str) -> Session<Vec<u8>> {
        Session::new(
            ServiceEndpoints::default(),
            Arc::new(InstantClient { result_path }),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn video_run_completes_and_prints_url() {
        let mut session = session("videos/area.mp4");
        let outcome = session.visualize(
            "area of x",
            GenerationOptions::default(),
            Some(Duration::from_secs(10)),
        );
        assert_eq!(outcome, Some(Outcome::Completed));

        let text = String::from_utf8(session.into_output()).unwrap();
        assert!(text.contains("Submitting: area of x"));
        assert!(text.contains("Video ready: area of x"));
        assert!(text.contains("http://localhost:5000/api/download/videos%2Farea.mp4"));
    }

    #[test]
    fn explanation_run_prints_loaded_text() {
        let mut session = session("explanations/limits.json");
        let outcome = session.visualize(
            "what is a limit",
            GenerationOptions::default(),
            Some(Duration::from_secs(10)),
        );
        assert_eq!(outcome, Some(Outcome::Completed));
        assert!(session.state().notice().is_none());

        let text = String::from_utf8(session.into_output()).unwrap();
        assert!(text.contains("# Limits\n\nApproach.\n"));
    }

    #[test]
    fn empty_selection_submits_nothing() {
        let mut session = session("videos/area.mp4");
        let outcome = session.visualize("♠ ♣", GenerationOptions::default(), None);
        assert_eq!(outcome, None);
        assert_eq!(session.state().phase(), Phase::Idle);
    }

    #[test]
    fn readiness_is_reported_from_the_service() {
        let mut session = session("videos/area.mp4");
        let readiness = session.check_readiness(Duration::from_secs(10));
        assert_eq!(
            readiness,
            ServiceReadiness::Misconfigured {
                message: "missing key".to_string()
            }
        );
    }

    struct SlowExplanationClient;

    #[async_trait]
    impl TaskClient for SlowExplanationClient {
        async fn submit(
            &self,
            _query: &str,
            _options: &GenerationOptions,
        ) -> Result<TaskId, ClientError> {
            Ok(TaskId::new("task-2"))
        }

        async fn fetch_status(&self, _task_id: &TaskId) -> Result<StatusSnapshot, ClientError> {
            Ok(StatusSnapshot::from_wire(
                "completed",
                Some(100),
                None,
                Some("explanations/slow.json".to_string()),
            ))
        }

        async fn check_readiness(&self) -> ServiceReadiness {
            ServiceReadiness::Ready
        }

        async fn fetch_explanation(&self, _url: &str) -> Result<Explanation, ClientError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Explanation {
                topic: "Late".to_string(),
                explanation: "Too late.".to_string(),
            })
        }
    }

    #[test]
    fn timeout_while_explanation_loads_is_a_cancellation() {
        let mut session = Session::new(
            ServiceEndpoints::default(),
            Arc::new(SlowExplanationClient),
            Vec::new(),
        )
        .unwrap();
        let outcome = session.visualize(
            "what is a limit",
            GenerationOptions::default(),
            Some(Duration::from_millis(500)),
        );

        assert_eq!(outcome, Some(Outcome::Cancelled));
        assert_eq!(session.state().view().presentation, None);
        assert_eq!(session.state().completed_task_snapshot(), None);
    }
}
