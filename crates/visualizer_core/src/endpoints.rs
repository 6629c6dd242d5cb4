use thiserror::Error;
use url::Url;

use crate::TaskId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("invalid service base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// URL builders for the generation service, rooted at a fixed base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base: Url,
}

impl ServiceEndpoints {
    pub fn parse(base: &str) -> Result<Self, EndpointError> {
        let invalid = |reason: String| EndpointError::InvalidBaseUrl {
            url: base.to_string(),
            reason,
        };
        let url = Url::parse(base.trim()).map_err(|err| invalid(err.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) url".to_string()));
        }
        Ok(Self { base: url })
    }

    pub fn generate(&self) -> Url {
        self.join(&["generate"])
    }

    pub fn status(&self, task_id: &TaskId) -> Url {
        self.join(&["status", task_id.as_str()])
    }

    /// `result_path` is encoded as one path segment: `/`, `%`, `?`, `#` and
    /// spaces are escaped, while sub-delimiters such as `:` `@` `&` `=` `+`
    /// are kept as is.
    pub fn download(&self, result_path: &str) -> Url {
        self.join(&["download", result_path])
    }

    pub fn setup(&self) -> Url {
        self.join(&["setup"])
    }

    pub fn videos(&self) -> Url {
        self.join(&["videos"])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `parse` rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self::parse(DEFAULT_BASE_URL).expect("default base url is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoints_under_base_path() {
        let endpoints = ServiceEndpoints::default();
        assert_eq!(
            endpoints.generate().as_str(),
            "http://localhost:5000/api/generate"
        );
        assert_eq!(
            endpoints.status(&TaskId::new("abc-1")).as_str(),
            "http://localhost:5000/api/status/abc-1"
        );
        assert_eq!(endpoints.setup().as_str(), "http://localhost:5000/api/setup");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let endpoints = ServiceEndpoints::parse("http://example.com/api/").unwrap();
        assert_eq!(endpoints.videos().as_str(), "http://example.com/api/videos");
    }

    #[test]
    fn download_encodes_whole_path_as_one_segment() {
        let endpoints = ServiceEndpoints::default();
        assert_eq!(
            endpoints.download("media/videos/clip one.mp4").as_str(),
            "http://localhost:5000/api/download/media%2Fvideos%2Fclip%20one.mp4"
        );
    }

    #[test]
    fn download_keeps_sub_delimiters_and_escapes_query_marks() {
        let endpoints = ServiceEndpoints::default();
        assert_eq!(
            endpoints.download("v:1@a&b=c+d.mp4").as_str(),
            "http://localhost:5000/api/download/v:1@a&b=c+d.mp4"
        );
        assert_eq!(
            endpoints.download("what?#1.json").as_str(),
            "http://localhost:5000/api/download/what%3F%231.json"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(ServiceEndpoints::parse("mailto:someone@example.com").is_err());
        assert!(ServiceEndpoints::parse("not a url").is_err());
    }
}
