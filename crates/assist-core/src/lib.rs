#![warn(missing_docs)]
//! Assist Core - Headless Assist Kernel for Line-Oriented Editors
//!
//! # Overview
//!
//! `assist-core` augments a line-oriented text editor with two
//! externally-sourced features: grammar-check annotations reported against a
//! flattened plain-text snapshot, and free-form text generation applied back
//! at the user's selection. The kernel reconciles offsets from the flattened
//! coordinate space with the live `(line, column)` document, applies edits
//! without corrupting selection state, and defends against concurrent local
//! edits. It does no I/O; network integrations live in
//! `assist-core-providers` and `assist-core-proxy`.
//!
//! # Core Features
//!
//! - **Position Mapping**: absolute character offsets ↔ `(line, column)`
//!   coordinates via a precomputed line-start table with binary search
//! - **Patch Application**: one atomic focus → select → replace transaction
//!   through the [`HostEditor`] capability seam
//! - **Annotation Sessions**: per-match lifecycle with snippet re-validation
//!   against a fresh snapshot before every apply
//! - **Generation Sessions**: selection capture, busy-state tracking, and
//!   the replace/insert-below/copy terminal actions
//! - **Typed Errors**: one closed [`AssistError`] taxonomy across the
//!   workspace
//!
//! # Quick Start
//!
//! ```rust
//! use assist_core::{AnalysisResponse, AnnotationSession, PadBuffer};
//!
//! let mut pad = PadBuffer::from_text("The quick brown fox.\nHe go to market.");
//! let mut session = AnnotationSession::new();
//!
//! let (request_id, request) = session.begin_analysis(&pad.text());
//! assert_eq!(request.language, "en-US");
//!
//! // Feed the collaborator's response back in (empty here).
//! session.complete_analysis(request_id, AnalysisResponse::default());
//! assert!(session.matches().is_empty());
//! ```
//!
//! # Module Description
//!
//! - [`position`] - flattened snapshots and offset ↔ position mapping
//! - [`patch`] - the host-editor seam and the range-replace transaction
//! - [`buffer`] - ropey-backed in-memory pad buffer
//! - [`analysis`] - wire data model for the analysis service
//! - [`annotation`] - grammar-analysis session state machine
//! - [`generation`] - generate-and-apply session state machine
//! - [`error`] - the closed error taxonomy

pub mod analysis;
pub mod annotation;
pub mod buffer;
pub mod error;
pub mod generation;
pub mod patch;
pub mod position;

pub use analysis::{
    AnalysisRequest, AnalysisResponse, DEFAULT_LANGUAGE, WireContext, WireMatch, WireReplacement,
    WireRule,
};
pub use annotation::{
    AnalysisOutcome, AnnotationMatch, AnnotationSession, ApplyOutcome, ContextExcerpt, MatchId,
    MatchState, RequestId, SessionState,
};
pub use buffer::PadBuffer;
pub use error::AssistError;
pub use generation::{
    CapturedRange, GenerationAction, GenerationOutcome, GenerationPreset, GenerationRequest,
    GenerationSession,
};
pub use patch::{HostEditor, apply_replacement};
pub use position::{FlattenedDocument, Position};
