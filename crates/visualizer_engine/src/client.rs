use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;
use visualizer_core::{
    Explanation, GenerationOptions, ServiceEndpoints, ServiceReadiness, StatusSnapshot, TaskId,
    TaskStatus,
};

use crate::wire::{
    ExplanationDocument, GenerateRequest, GenerateResponse, SetupResponse, StatusResponse,
    VideoEntry,
};
use crate::ClientError;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoints: ServiceEndpoints,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoints: ServiceEndpoints::default(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            max_download_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Request operations against the generation service. Implementations never
/// retry; the coordinator decides what happens after a failure.
#[async_trait::async_trait]
pub trait TaskClient: Send + Sync {
    async fn submit(&self, query: &str, options: &GenerationOptions)
        -> Result<TaskId, ClientError>;

    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusSnapshot, ClientError>;

    /// Never fails: transport errors classify the service as offline.
    async fn check_readiness(&self) -> ServiceReadiness;

    async fn fetch_explanation(&self, url: &str) -> Result<Explanation, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTaskClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestTaskClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::ServiceUnavailable(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.settings.endpoints
    }

    /// Auxiliary listing of previously generated videos.
    pub async fn list_videos(&self) -> Result<Vec<VideoEntry>, ClientError> {
        self.get_json(self.endpoints().videos()).await
    }

    /// Downloads a media result, refusing bodies above `max_download_bytes`.
    pub async fn download_video(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let url = parse_url(url)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::BadResponse {
                status: status.as_u16(),
            });
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClientError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClientError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        engine_debug!("downloaded {} bytes", bytes.len());
        Ok(bytes)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        engine_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl TaskClient for ReqwestTaskClient {
    async fn submit(
        &self,
        query: &str,
        options: &GenerationOptions,
    ) -> Result<TaskId, ClientError> {
        let body = GenerateRequest {
            topic: query,
            difficulty: options.difficulty().as_str(),
            duration: options.duration_secs(),
            quality: options.quality().as_str(),
        };
        let payload =
            serde_json::to_vec(&body).map_err(|err| ClientError::InvalidBody(err.to_string()))?;

        let url = self.endpoints().generate();
        engine_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let accepted: GenerateResponse = read_json(response).await?;
        if accepted.task_id.is_empty() {
            return Err(ClientError::InvalidBody("empty task_id".to_string()));
        }
        Ok(TaskId::new(accepted.task_id))
    }

    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusSnapshot, ClientError> {
        let wire: StatusResponse = self.get_json(self.endpoints().status(task_id)).await?;
        let snapshot =
            StatusSnapshot::from_wire(&wire.status, wire.progress, wire.message, wire.video_path);
        if let TaskStatus::Unsupported(raw) = &snapshot.status {
            engine_warn!("task {} reported unrecognised status {:?}", task_id, raw);
        }
        Ok(snapshot)
    }

    async fn check_readiness(&self) -> ServiceReadiness {
        let url = self.endpoints().setup();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                engine_warn!("Backend is offline: {}", err);
                return ServiceReadiness::Offline;
            }
        };
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                engine_warn!("Backend is offline: {}", err);
                return ServiceReadiness::Offline;
            }
        };
        match serde_json::from_slice::<SetupResponse>(&body) {
            Ok(setup) if setup.status == "ok" => ServiceReadiness::Ready,
            Ok(setup) => {
                let message = setup
                    .message
                    .unwrap_or_else(|| format!("setup status {:?}", setup.status));
                engine_warn!("Backend setup issue: {}", message);
                ServiceReadiness::Misconfigured { message }
            }
            Err(err) => {
                engine_warn!("Backend setup response unreadable: {}", err);
                ServiceReadiness::Misconfigured {
                    message: format!("unreadable setup response: {err}"),
                }
            }
        }
    }

    async fn fetch_explanation(&self, url: &str) -> Result<Explanation, ClientError> {
        let document: ExplanationDocument = self.get_json(parse_url(url)?).await?;
        Ok(Explanation {
            topic: document.topic,
            explanation: document.explanation,
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::BadResponse {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ClientError::InvalidBody(err.to_string()))
}

fn parse_url(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|_| ClientError::InvalidUrl(url.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::ServiceUnavailable(format!("timed out: {err}"));
    }
    ClientError::ServiceUnavailable(err.to_string())
}
