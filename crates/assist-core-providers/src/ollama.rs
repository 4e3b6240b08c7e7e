//! Local-model backend speaking the Ollama generate protocol.

use assist_core::{AssistError, GenerationRequest};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::provider::{GenerationProvider, ProviderConfig, bounded, compose_prompt, map_transport_error};

#[derive(Serialize)]
struct GenerateCall<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: Option<String>,
}

/// Provider for a local model server at `api_url`, typically
/// `http://localhost:11434`.
pub struct OllamaProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OllamaProvider {
    /// Build a provider from connection settings.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.api_url.trim_end_matches('/'))
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, AssistError> {
        let model = request
            .model_override
            .as_deref()
            .unwrap_or(&self.config.model);
        let prompt = compose_prompt(request);
        let body = GenerateCall {
            model,
            prompt: &prompt,
            stream: false,
        };

        debug!(model, endpoint = %self.endpoint(), "issuing generate call");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "generate call rejected");
            return Err(AssistError::HttpError {
                status: status.as_u16(),
            });
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|_| AssistError::MalformedResponse)?;
        let text = reply.response.ok_or(AssistError::MalformedResponse)?;
        Ok(text.trim().to_string())
    }
}

impl GenerationProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, AssistError> {
        bounded(self.config.timeout(), cancel, self.call(request)).await
    }
}
