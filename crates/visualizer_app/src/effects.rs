use std::io;
use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use visualizer_core::{Effect, Msg};
use visualizer_engine::{EngineEvent, EngineHandle, TaskClient};

/// Forwards core effects to the engine and engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn TaskClient>) -> io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(client)?,
        })
    }

    pub fn is_stopped(&self) -> bool {
        self.engine.is_stopped()
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::Submit { token, query, .. } => {
                    engine_info!("Submit session={} query={:?}", token, query);
                }
                Effect::FetchStatus {
                    token,
                    task_id,
                    delay,
                } => {
                    engine_info!(
                        "FetchStatus session={} task={} delay_ms={}",
                        token,
                        task_id,
                        delay.as_millis()
                    );
                }
                Effect::StopPolling { token } => {
                    engine_info!("StopPolling session={}", token);
                }
                Effect::LoadExplanation { token, url } => {
                    engine_info!("LoadExplanation session={} url={}", token, url);
                }
                Effect::CheckReadiness => {}
            }
            self.engine.send(effect.into());
        }
    }

    pub fn try_recv(&mut self) -> Option<Msg> {
        let event = self.engine.try_recv()?;
        match &event {
            EngineEvent::StatusFetched {
                token,
                result: Ok(snapshot),
            } => {
                engine_info!(
                    "Status session={} status={:?} progress={}",
                    token,
                    snapshot.status,
                    snapshot.progress
                );
            }
            EngineEvent::Submitted { token, result: Err(err) }
            | EngineEvent::StatusFetched { token, result: Err(err) }
            | EngineEvent::ExplanationLoaded { token, result: Err(err) } => {
                engine_warn!("Session {} request failed: {}", token, err);
            }
            _ => {}
        }
        Some(event.into())
    }
}
