//! The uniform generation contract and shared provider plumbing.
//!
//! Every backend implements [`GenerationProvider`]: one non-retried call,
//! bounded by the configured timeout, cancellable from outside, normalized
//! into a trimmed string or a typed [`AssistError`]. Retry policy belongs to
//! the caller; no provider retries internally.

use assist_core::{AssistError, GenerationRequest};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::chat::OpenRouterProvider;
use crate::ollama::OllamaProvider;

/// Request bound applied when the configuration does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

/// Connection settings for a single provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub api_url: String,
    /// Credential for bearer auth, when the protocol requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model used when the request carries no override.
    pub model: String,
    /// Whole-request bound in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    /// Create a config with the default timeout and no credential.
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            model: model.into(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Attach a bearer credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the whole-request bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// The whole-request bound as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Uniform generation contract implemented by every backend.
pub trait GenerationProvider {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Issue one generation call and normalize the response into trimmed
    /// text.
    ///
    /// The call is bounded by the provider's configured timeout and aborted
    /// when `cancel` fires; both surface as [`AssistError::Timeout`]. All
    /// transport and protocol failures map onto the closed taxonomy rather
    /// than leaking raw errors.
    fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, AssistError>> + Send;
}

/// Which backend protocol a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local model server speaking the Ollama generate protocol.
    Ollama,
    /// Hosted model behind an OpenAI-style chat-completions protocol.
    OpenRouter,
}

/// Assistant configuration as exposed by the host settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Selected backend, if any.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    /// Local-model connection settings.
    #[serde(default)]
    pub ollama: Option<ProviderConfig>,
    /// Hosted-model connection settings.
    #[serde(default)]
    pub openrouter: Option<ProviderConfig>,
}

/// A configured provider behind a single dispatch point.
pub enum AnyProvider {
    /// Local-model backend.
    Ollama(OllamaProvider),
    /// Hosted-model backend.
    OpenRouter(OpenRouterProvider),
}

impl AnyProvider {
    /// Build the provider selected by `settings`.
    ///
    /// Fails with [`AssistError::NotConfigured`] when no provider is
    /// selected or the selected provider has no connection settings.
    pub fn from_settings(settings: &AssistantSettings) -> Result<Self, AssistError> {
        match settings.provider {
            Some(ProviderKind::Ollama) => {
                let config = settings.ollama.clone().ok_or(AssistError::NotConfigured)?;
                Ok(Self::Ollama(OllamaProvider::new(config)))
            }
            Some(ProviderKind::OpenRouter) => {
                let config = settings
                    .openrouter
                    .clone()
                    .ok_or(AssistError::NotConfigured)?;
                Ok(Self::OpenRouter(OpenRouterProvider::new(config)))
            }
            None => Err(AssistError::NotConfigured),
        }
    }
}

impl GenerationProvider for AnyProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Ollama(provider) => provider.name(),
            Self::OpenRouter(provider) => provider.name(),
        }
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, AssistError> {
        match self {
            Self::Ollama(provider) => provider.generate(request, cancel).await,
            Self::OpenRouter(provider) => provider.generate(request, cancel).await,
        }
    }
}

/// Compose the wire prompt from the instruction and the captured text.
pub(crate) fn compose_prompt(request: &GenerationRequest) -> String {
    format!("{}\n\nText: {}", request.instruction, request.source_text)
}

/// Map a transport-level failure onto the closed taxonomy.
pub(crate) fn map_transport_error(err: reqwest::Error) -> AssistError {
    if err.is_timeout() {
        AssistError::Timeout
    } else if err.is_decode() {
        AssistError::MalformedResponse
    } else {
        AssistError::ConnectionFailed
    }
}

/// Run `call` bounded by `timeout` and `cancel`.
///
/// Dropping the request future aborts the underlying connection, so neither
/// path leaves the call running. Both abort paths surface as
/// [`AssistError::Timeout`], matching the single aborted-request error the
/// host presents.
pub(crate) async fn bounded<F, T>(
    timeout: Duration,
    cancel: &CancellationToken,
    call: F,
) -> Result<T, AssistError>
where
    F: Future<Output = Result<T, AssistError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(AssistError::Timeout),
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(result) => result,
            Err(_) => Err(AssistError::Timeout),
        },
    }
}
