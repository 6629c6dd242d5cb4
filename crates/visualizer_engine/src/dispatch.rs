use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use visualizer_core::{SessionToken, TaskId};

use crate::client::TaskClient;
use crate::{EngineCommand, EngineEvent};

type PollHandles = HashMap<SessionToken, CancellationToken>;

/// Executes engine commands on the current tokio runtime.
///
/// Each session's status fetches hang off one cancellable handle. Handles are
/// created and revoked synchronously inside [`Dispatcher::dispatch`], so a
/// `StopPolling` issued after a `FetchStatus` always wins, whether the fetch
/// is still waiting out its delay or already in flight.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn TaskClient>,
    events: UnboundedSender<EngineEvent>,
    polls: Arc<Mutex<PollHandles>>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn TaskClient>, events: UnboundedSender<EngineEvent>) -> Self {
        Self {
            client,
            events,
            polls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, command: EngineCommand) {
        match command {
            EngineCommand::StopPolling { token } => self.revoke(token),
            EngineCommand::FetchStatus {
                token,
                task_id,
                delay,
            } => {
                let handle = self.poll_handle(token);
                let this = self.clone();
                tokio::spawn(async move {
                    this.fetch_status(token, task_id, delay, handle).await;
                });
            }
            other => {
                let this = self.clone();
                tokio::spawn(async move {
                    this.execute(other).await;
                });
            }
        }
    }

    /// Number of sessions with a live poll handle.
    pub fn active_polls(&self) -> usize {
        self.lock_polls().len()
    }

    async fn execute(&self, command: EngineCommand) {
        let event = match command {
            EngineCommand::CheckReadiness => {
                let readiness = self.client.check_readiness().await;
                engine_info!("Backend readiness: {:?}", readiness);
                EngineEvent::ReadinessChecked(readiness)
            }
            EngineCommand::Submit {
                token,
                query,
                options,
            } => {
                engine_info!(
                    "Submit session={} query_len={} difficulty={} quality={} duration={}",
                    token,
                    query.len(),
                    options.difficulty(),
                    options.quality(),
                    options.duration_secs()
                );
                let result = self.client.submit(&query, &options).await;
                if let Err(err) = &result {
                    engine_warn!("Submit for session {} failed: {}", token, err);
                }
                EngineEvent::Submitted { token, result }
            }
            EngineCommand::LoadExplanation { token, url } => {
                let result = self.client.fetch_explanation(&url).await;
                if let Err(err) = &result {
                    engine_warn!("Explanation for session {} failed: {}", token, err);
                }
                EngineEvent::ExplanationLoaded { token, result }
            }
            EngineCommand::FetchStatus { .. } | EngineCommand::StopPolling { .. } => return,
        };
        let _ = self.events.send(event);
    }

    async fn fetch_status(
        &self,
        token: SessionToken,
        task_id: TaskId,
        delay: Duration,
        handle: CancellationToken,
    ) {
        tokio::select! {
            biased;
            _ = handle.cancelled() => {
                engine_debug!("Poll for session {} revoked before fetch", token);
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let result = tokio::select! {
            biased;
            _ = handle.cancelled() => {
                engine_debug!("Poll for session {} revoked during fetch", token);
                return;
            }
            result = self.client.fetch_status(&task_id) => result,
        };

        if let Err(err) = &result {
            engine_warn!("Status fetch for task {} failed: {}", task_id, err);
        }
        let _ = self.events.send(EngineEvent::StatusFetched { token, result });
    }

    fn poll_handle(&self, token: SessionToken) -> CancellationToken {
        self.lock_polls().entry(token).or_default().clone()
    }

    fn revoke(&self, token: SessionToken) {
        if let Some(handle) = self.lock_polls().remove(&token) {
            engine_debug!("Revoking polls for session {}", token);
            handle.cancel();
        }
    }

    fn lock_polls(&self) -> MutexGuard<'_, PollHandles> {
        self.polls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
