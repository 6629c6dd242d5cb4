use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::engine_error;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::client::TaskClient;
use crate::dispatch::Dispatcher;
use crate::{EngineCommand, EngineEvent};

/// Owns a background thread running a tokio runtime. Commands go in through
/// [`EngineHandle::send`]; results come back through [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: UnboundedReceiver<EngineEvent>,
    stopped: bool,
}

impl EngineHandle {
    /// Fails when the engine runtime cannot be built.
    pub fn new(client: Arc<dyn TaskClient>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = unbounded_channel();

        thread::Builder::new()
            .name("visualizer-engine".to_string())
            .spawn(move || {
                let _enter = runtime.enter();
                let dispatcher = Dispatcher::new(client, event_tx);
                while let Ok(command) = cmd_rx.recv() {
                    dispatcher.dispatch(command);
                }
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            stopped: false,
        })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine thread is gone; command dropped");
        }
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.stopped {
                    engine_error!("Engine thread stopped; no further events");
                    self.stopped = true;
                }
                None
            }
        }
    }

    /// True once the engine thread has gone away and every event was drained.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
