//! AnswerClient trait implementation for HttpAnswerClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AnswerClient, AnswerError, AnswerRequest, AnswerResponse};

use super::classify::{classify_status, classify_transport};
use super::client::HttpAnswerClient;

#[async_trait]
impl AnswerClient for HttpAnswerClient {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, AnswerError> {
        let url = self.chat_url();

        debug!(%url, context_len = request.context.len(), "answer service request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        response
            .json::<AnswerResponse>()
            .await
            .map_err(|e| AnswerError::Unclassified(format!("invalid response body: {e}")))
    }
}
