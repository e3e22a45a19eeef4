use async_trait::async_trait;
use tracing::debug;

use crate::error::UpstreamError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse};

// Anything that can turn a chat-completion request into a response
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn send_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError>;
}

// OpenAI-compatible endpoint over HTTPS with bearer auth
pub struct HttpCompletionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn send_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        debug!(url = %self.api_url, model = %request.model, "Calling completion API");

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        res.json::<ChatCompletionResponse>()
            .await
            .map_err(UpstreamError::Decode)
    }
}
