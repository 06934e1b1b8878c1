//! HTTP client struct and the backend's auxiliary endpoints.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::AnswerError;

use super::classify::{classify_status, classify_transport};
use super::config::HttpAnswerConfig;

const STATUS_PATH: &str = "/api/status";
const EXAMPLES_PATH: &str = "/api/examples";

/// Health report returned by `GET /api/status`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub message: String,
    pub model_loaded: bool,
    pub index_loaded: bool,
    pub chunks_count: u64,
}

impl ServiceStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(serde::Deserialize)]
struct ExamplesBody {
    examples: Vec<String>,
}

/// Answer service client over HTTP/JSON.
pub struct HttpAnswerClient {
    pub(crate) config: HttpAnswerConfig,
    pub(crate) http: reqwest::Client,
}

impl HttpAnswerClient {
    pub fn new(config: HttpAnswerConfig) -> Result<Self, AnswerError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AnswerError::Unclassified(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &HttpAnswerConfig {
        &self.config
    }

    pub(crate) fn chat_url(&self) -> String {
        self.config.endpoint(&self.config.chat_path)
    }

    /// Query the backend's health endpoint.
    pub async fn status(&self) -> Result<ServiceStatus, AnswerError> {
        self.get_json(STATUS_PATH).await
    }

    /// Fetch the backend's suggested starter questions.
    pub async fn examples(&self) -> Result<Vec<String>, AnswerError> {
        let body: ExamplesBody = self.get_json(EXAMPLES_PATH).await?;
        Ok(body.examples)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AnswerError> {
        let url = self.config.endpoint(path);
        debug!(%url, "answer service GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| AnswerError::Unclassified(format!("invalid response body: {e}")))
    }
}
