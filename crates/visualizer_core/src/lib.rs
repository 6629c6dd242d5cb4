//! Visualizer core: selection cleanup, the task lifecycle state machine and
//! result routing. No IO happens here.
mod effect;
mod endpoints;
mod error;
mod msg;
mod normalize;
mod options;
pub mod route;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::{Effect, POLL_INTERVAL};
pub use endpoints::{EndpointError, ServiceEndpoints, DEFAULT_BASE_URL};
pub use error::{TaskError, GENERIC_FAILURE_MESSAGE};
pub use msg::Msg;
pub use normalize::normalize_selection;
pub use options::{Difficulty, GenerationOptions, OptionsError, Quality, DEFAULT_DURATION_SECS};
pub use route::{classify_result, RenderTarget, ResultKind, Route};
pub use state::{AppState, CompletedTaskSnapshot, Phase, TaskSession, SUBMITTING_MESSAGE};
pub use status::{
    Explanation, ServiceReadiness, SessionToken, StatusSnapshot, TaskId, TaskStatus,
    DEFAULT_STATUS_MESSAGE,
};
pub use update::update;
pub use view_model::AppViewModel;
