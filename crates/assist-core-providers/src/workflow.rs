//! End-to-end drivers tying the kernel sessions to the network clients.
//!
//! The sessions in `assist-core` are synchronous state machines; these
//! functions run the async leg between their begin and complete calls and
//! keep the state machines honest on every exit path.

use assist_core::{
    AnalysisOutcome, AnnotationSession, AssistError, GenerationPreset, GenerationSession,
    HostEditor,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analysis_client::AnalysisClient;
use crate::provider::GenerationProvider;

/// Run one generation call from capture through completion.
///
/// On success the session holds the result text and awaits an apply action;
/// on failure the busy flag is cleared and the error is returned. No
/// provider call is issued when the capture itself fails.
pub async fn run_generation<P: GenerationProvider>(
    session: &mut GenerationSession,
    host: &dyn HostEditor,
    provider: &P,
    preset: GenerationPreset,
    custom_instruction: Option<&str>,
    model_override: Option<String>,
    cancel: &CancellationToken,
) -> Result<(), AssistError> {
    let request = session.begin(host, preset, custom_instruction, model_override)?;

    match provider.generate(&request, cancel).await {
        Ok(text) => {
            info!(provider = provider.name(), chars = text.chars().count(), "generation complete");
            session.complete(text);
            Ok(())
        }
        Err(err) => {
            warn!(provider = provider.name(), error = %err, "generation failed");
            Err(session.fail(err))
        }
    }
}

/// Run one analysis round trip against the check endpoint.
///
/// A response that lost the race to a newer request reports
/// [`AnalysisOutcome::Superseded`] and leaves the session untouched. A
/// transport failure aborts the pending request so the session returns to
/// idle.
pub async fn run_analysis(
    session: &mut AnnotationSession,
    host: &dyn HostEditor,
    client: &AnalysisClient,
) -> Result<AnalysisOutcome, AssistError> {
    let (request_id, request) = session.begin_analysis(&host.document_text());

    match client.check(&request).await {
        Ok(response) => Ok(session.complete_analysis(request_id, response)),
        Err(err) => {
            warn!(error = %err, "analysis failed");
            session.abort_analysis(request_id);
            Err(err)
        }
    }
}
