#![warn(missing_docs)]
//! Network integrations for `assist-core`.
//!
//! The kernel crate is synchronous and does no I/O; this crate supplies the
//! async half: the [`GenerationProvider`] contract with its two backends,
//! the [`AnalysisClient`] for the grammar-check endpoint, and the
//! [`workflow`] drivers that run a whole capture → call → record round trip
//! against the kernel's session state machines.
//!
//! Every call is bounded by the configured timeout and cancellable through a
//! [`tokio_util::sync::CancellationToken`]; failures surface only as
//! [`assist_core::AssistError`] variants.

pub mod analysis_client;
pub mod chat;
pub mod ollama;
pub mod provider;
pub mod workflow;

pub use analysis_client::AnalysisClient;
pub use chat::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, OpenRouterProvider};
pub use ollama::OllamaProvider;
pub use provider::{
    AnyProvider, AssistantSettings, DEFAULT_TIMEOUT, GenerationProvider, ProviderConfig,
    ProviderKind,
};
pub use workflow::{run_analysis, run_generation};
