//! HTTP client for the grammar-analysis endpoint.

use assist_core::{AnalysisRequest, AnalysisResponse, AssistError};
use tracing::{debug, warn};

use crate::provider::map_transport_error;

/// Posts analysis requests to the proxy's check endpoint and decodes the
/// match list.
pub struct AnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AnalysisClient {
    /// Build a client for the given check endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit one analysis request.
    pub async fn check(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AssistError> {
        debug!(endpoint = %self.endpoint, chars = request.text.chars().count(), "submitting analysis");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "analysis call rejected");
            return Err(AssistError::HttpError {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|_| AssistError::MalformedResponse)
    }
}
