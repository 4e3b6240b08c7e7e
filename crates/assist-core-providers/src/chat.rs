//! Hosted-model backend behind an OpenAI-style chat-completions protocol.

use assist_core::{AssistError, GenerationRequest};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::provider::{GenerationProvider, ProviderConfig, bounded, compose_prompt, map_transport_error};

/// Sampling temperature sent with every call.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Completion-length cap sent with every call.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

#[derive(Serialize)]
struct ChatCall<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// Provider for a hosted model reached over chat completions with bearer
/// auth, such as OpenRouter.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenRouterProvider {
    /// Build a provider from connection settings.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, AssistError> {
        // Refuse up front rather than send an unauthenticated call.
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AssistError::NotConfigured)?;

        let model = request
            .model_override
            .as_deref()
            .unwrap_or(&self.config.model);
        let prompt = compose_prompt(request);
        let body = ChatCall {
            model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        debug!(model, endpoint = %self.endpoint(), "issuing chat call");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat call rejected");
            return Err(match status.as_u16() {
                401 => AssistError::InvalidCredential,
                429 => AssistError::RateLimited,
                code => AssistError::HttpError { status: code },
            });
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|_| AssistError::MalformedResponse)?;
        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AssistError::MalformedResponse)?;
        Ok(text.trim().to_string())
    }
}

impl GenerationProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, AssistError> {
        bounded(self.config.timeout(), cancel, self.call(request)).await
    }
}
