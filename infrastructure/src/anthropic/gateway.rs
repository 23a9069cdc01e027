//! LLM Gateway implementation for an Anthropic-style Messages API

use crate::anthropic::protocol::{
    ApiError, ApiRequest, ApiResponse, SseDelta, SseEvent, API_VERSION,
};
use crate::anthropic::sse::SseParser;
use async_trait::async_trait;
use counsel_application::ports::llm_gateway::{
    CompletionRequest, GatewayError, LlmGateway, StreamHandle,
};
use counsel_domain::{LlmResponse, StreamEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Buffer size of the per-stream event channel
const STREAM_CHANNEL_CAPACITY: usize = 32;

/// Connection settings for the chat-completion backend
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Gateway adapter speaking the Anthropic Messages API over HTTPS
pub struct AnthropicGateway {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicGateway {
    pub fn new(config: AnthropicConfig) -> Self {
        info!(model = %config.model, base_url = %config.base_url, "AnthropicGateway initialized");
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_request(&self, request: CompletionRequest) -> ApiRequest {
        ApiRequest::new(
            &self.config.model,
            self.config.max_tokens,
            request.system_prompt,
            request.messages,
            request.tools,
        )
    }

    async fn post(&self, body: &ApiRequest) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&text)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(text);
            warn!(status = %status, "completion request rejected");
            return Err(GatewayError::RequestFailed(format!("{status}: {detail}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, GatewayError> {
        let body = self.build_request(request);
        debug!(model = %body.model, messages = body.messages.len(), tools = body.tools.len(), "blocking completion");

        let response = self.post(&body).await?;
        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into_domain())
    }

    async fn stream(&self, request: CompletionRequest) -> Result<StreamHandle, GatewayError> {
        let body = self.build_request(request).streaming();
        debug!(model = %body.model, messages = body.messages.len(), "streaming completion");

        let response = self.post(&body).await?;
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut parser = SseParser::new();
            let mut byte_stream = response.bytes_stream();

            while let Some(chunk) = byte_stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };

                for payload in parser.feed(&bytes) {
                    let event = match serde_json::from_str::<SseEvent>(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            debug!(error = %e, "skipping unparseable stream frame");
                            continue;
                        }
                    };
                    match event {
                        SseEvent::ContentBlockDelta {
                            delta: SseDelta::TextDelta { text },
                        } => {
                            if tx.send(StreamEvent::Delta(text)).await.is_err() {
                                return;
                            }
                        }
                        SseEvent::MessageStop => {
                            let _ = tx.send(StreamEvent::Completed).await;
                            return;
                        }
                        SseEvent::Error { error } => {
                            warn!(kind = %error.kind, "stream error frame");
                            let _ = tx.send(StreamEvent::Error(error.message)).await;
                            return;
                        }
                        _ => {}
                    }
                }
            }
            // Connection closed without message_stop: the receiver observes
            // the closed channel and treats the stream as interrupted.
        });

        Ok(StreamHandle::new(rx))
    }
}
