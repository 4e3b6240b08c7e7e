#![warn(missing_docs)]
//! Server-side analysis proxy.
//!
//! Sits between editor clients and a LanguageTool-compatible backend so the
//! backend URL and any credentials stay off the client. Exposes one route,
//! `POST /check`, which validates the request, re-encodes it as the form
//! body the backend expects, and passes the backend's JSON through
//! untouched.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

/// Language assumed when the client sends none.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Shared state for the proxy routes.
pub struct ProxyState {
    client: reqwest::Client,
    backend_url: String,
}

impl ProxyState {
    /// Create state pointing at a LanguageTool-compatible backend base URL.
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend_url: backend_url.into(),
        }
    }

    fn check_url(&self) -> String {
        format!("{}/v2/check", self.backend_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct CheckRequest {
    text: Option<String>,
    language: Option<String>,
}

/// Build the proxy router.
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new().route("/check", post(check)).with_state(state)
}

async fn check(State(state): State<Arc<ProxyState>>, Json(request): Json<CheckRequest>) -> Response {
    let text = match request.text.filter(|text| !text.is_empty()) {
        Some(text) => text,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing text parameter" })),
            )
                .into_response();
        }
    };
    let language = request
        .language
        .filter(|language| !language.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    info!(chars = text.chars().count(), %language, "forwarding check");
    let response = match state
        .client
        .post(state.check_url())
        .form(&[("text", text.as_str()), ("language", language.as_str())])
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "analysis backend unreachable");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Analysis backend unreachable" })),
            )
                .into_response();
        }
    };

    // Pass the backend's body through untouched, including its match
    // positions, so clients see exactly what the backend reported.
    match response.json::<Value>().await {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            error!(error = %err, "analysis backend returned invalid JSON");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Invalid response from analysis backend" })),
            )
                .into_response()
        }
    }
}
