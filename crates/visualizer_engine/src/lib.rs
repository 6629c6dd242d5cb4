//! Visualizer engine: HTTP exchange with the generation service and effect
//! execution.
mod client;
mod dispatch;
mod engine;
mod persist;
mod types;
mod wire;

pub use client::{ClientSettings, ReqwestTaskClient, TaskClient};
pub use dispatch::Dispatcher;
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, result_file_name, AtomicFileWriter, PersistError};
pub use types::{ClientError, EngineCommand, EngineEvent};
pub use wire::VideoEntry;
