//! Presentation routing for completed tasks.
//!
//! The result kind is inferred from the result path's file suffix only. This
//! is a naming convention shared with the service; the content is never
//! inspected.

use crate::ServiceEndpoints;

pub const VIDEO_SUFFIX: &str = ".mp4";
pub const EXPLANATION_SUFFIX: &str = ".json";

const TITLE_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Video,
    Explanation,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::Video => "video",
            ResultKind::Explanation => "explanation",
        }
    }
}

pub fn classify_result(result_path: &str) -> Option<ResultKind> {
    if result_path.ends_with(VIDEO_SUFFIX) {
        Some(ResultKind::Video)
    } else if result_path.ends_with(EXPLANATION_SUFFIX) {
        Some(ResultKind::Explanation)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Media served by reference; nothing else to fetch.
    PlayVideo { url: String },
    /// A JSON document with `topic` and `explanation` must be fetched first.
    LoadExplanation { url: String },
    Unsupported { result_path: String },
}

pub fn route(endpoints: &ServiceEndpoints, result_path: &str) -> Route {
    match classify_result(result_path) {
        Some(ResultKind::Video) => Route::PlayVideo {
            url: endpoints.download(result_path).to_string(),
        },
        Some(ResultKind::Explanation) => Route::LoadExplanation {
            url: endpoints.download(result_path).to_string(),
        },
        None => Route::Unsupported {
            result_path: result_path.to_string(),
        },
    }
}

/// What the user is finally shown for a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    Video { url: String, title: String },
    Explanation { topic: String, explanation: String },
}

/// First 50 characters of the query, with `...` when truncated.
pub fn video_title(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(TITLE_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
