//! JSON bodies exchanged with the generation service.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub topic: &'a str,
    pub difficulty: &'a str,
    pub duration: u32,
    pub quality: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetupResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExplanationDocument {
    pub topic: String,
    pub explanation: String,
}

/// One entry of the service's generated-video listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub created: f64,
}
