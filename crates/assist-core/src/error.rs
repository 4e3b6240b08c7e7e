//! Error taxonomy shared across the workspace.
//!
//! Every failure surfaced by the kernel and its protocol integrations is one
//! of these variants. Lower layers (mapper, providers) always return a typed
//! value; the session layer is the only place that turns them into
//! user-visible notices.

use thiserror::Error;

/// The closed set of failures for assist operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// The remote call did not finish within the configured bound, or was
    /// cancelled by the caller's cancellation signal.
    #[error("request timed out")]
    Timeout,
    /// The remote service could not be reached.
    #[error("could not connect to the remote service")]
    ConnectionFailed,
    /// The hosted provider rejected the configured credential (HTTP 401).
    #[error("invalid API credential")]
    InvalidCredential,
    /// The hosted provider rate-limited the caller (HTTP 429).
    #[error("rate limit exceeded, try again later")]
    RateLimited,
    /// A response arrived but did not carry the expected field.
    #[error("malformed response from the remote service")]
    MalformedResponse,
    /// Any other non-success HTTP status.
    #[error("remote service returned HTTP {status}")]
    HttpError {
        /// The HTTP status code returned by the remote service.
        status: u16,
    },
    /// An offset, position, or index fell outside the valid range.
    #[error("position outside the document")]
    OutOfRange,
    /// The target range no longer exists in the live document.
    #[error("the document changed since this position was computed")]
    StalePosition,
    /// The selection (or fallback line) was empty or whitespace.
    #[error("no text selected")]
    NoInputSelected,
    /// Another operation is already in flight in this session.
    #[error("an operation is already in progress")]
    Busy,
    /// The requested provider is missing required configuration.
    #[error("provider is not configured")]
    NotConfigured,
}
