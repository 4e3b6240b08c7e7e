//! Annotation session: one grammar-analysis pass over the document.
//!
//! A session owns the flattened snapshot sent for analysis, the matches the
//! service reported against it, and the per-match lifecycle. It is the only
//! place that defends against edit races: before any replacement is written,
//! the match span is re-derived from a freshly captured snapshot of the live
//! document and the substring there must still equal the substring recorded
//! at analysis time. On mismatch the session transitions to Invalidated and
//! nothing is mutated; the caller re-runs analysis rather than guess.
//!
//! States: `Idle → Analyzing → Ready → (apply* → Ready | Invalidated) → Idle`.

use crate::analysis::{AnalysisRequest, AnalysisResponse, DEFAULT_LANGUAGE, WireContext};
use crate::error::AssistError;
use crate::patch::{HostEditor, apply_replacement};
use crate::position::{FlattenedDocument, Position};

/// Identifier of one analysis request within a session. Monotonically
/// increasing; a new request supersedes any in-flight one.
pub type RequestId = u64;

/// Identifier of one match within the current Ready list.
pub type MatchId = usize;

/// Lifecycle state of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Reported and awaiting a user decision.
    Pending,
    /// Its suggestion was written into the document.
    Applied,
    /// Ignored by the user; no document effect.
    Dismissed,
    /// Its span was touched by another applied match.
    Invalidated,
}

/// Excerpt around a match for display; `offset`/`length` are relative to
/// `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextExcerpt {
    /// The excerpt text.
    pub text: String,
    /// Start of the issue within the excerpt, in characters.
    pub offset: usize,
    /// Length of the issue within the excerpt, in characters.
    pub length: usize,
}

impl From<WireContext> for ContextExcerpt {
    fn from(context: WireContext) -> Self {
        Self {
            text: context.text,
            offset: context.offset,
            length: context.length,
        }
    }
}

/// One reported issue bound to the session's snapshot.
#[derive(Debug, Clone)]
pub struct AnnotationMatch {
    /// Session-local identifier.
    pub id: MatchId,
    /// Absolute character offset into the flattened snapshot.
    pub offset: usize,
    /// Span length in characters.
    pub length: usize,
    /// Human-readable description of the issue.
    pub message: String,
    /// Stable rule identifier.
    pub rule_id: String,
    /// Optional human-readable rule description.
    pub rule_description: Option<String>,
    /// Excerpt around the issue, for display.
    pub context: Option<ContextExcerpt>,
    /// Candidate replacement texts, best first.
    pub suggestions: Vec<String>,
    /// Exact substring at analysis time; re-checked before any apply.
    pub snippet: String,
    /// Lifecycle state.
    pub state: MatchState,
}

/// Session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No analysis pass active.
    Idle,
    /// A request is in flight; its response has not been installed yet.
    Analyzing,
    /// Matches are installed and can be applied or dismissed.
    Ready,
    /// The document changed under a pending apply; matches are unusable and
    /// a new analysis is required.
    Invalidated,
}

/// Outcome of completing an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Matches installed; the session is Ready.
    Ready {
        /// Matches surviving the span-bounds check.
        match_count: usize,
        /// Matches dropped because their span exceeded the snapshot.
        dropped: usize,
    },
    /// The response belonged to a superseded request and was discarded.
    Superseded,
}

/// Outcome of applying a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The replacement was written; the caret sits just after it.
    Applied {
        /// Caret position after the inserted text.
        caret: Position,
        /// How many other pending matches overlapped the edit and were
        /// invalidated.
        invalidated: usize,
    },
    /// The document changed since analysis. Nothing was mutated and the
    /// session moved to Invalidated.
    DocumentChanged,
}

/// A stateful orchestrator for one grammar-check workflow.
///
/// Owned and passed by the caller; independent sessions never share
/// snapshots. All transitions are explicit method calls, so the session is
/// testable without any UI toolkit.
pub struct AnnotationSession {
    state: SessionState,
    snapshot: Option<FlattenedDocument>,
    matches: Vec<AnnotationMatch>,
    next_request: RequestId,
    current_request: Option<RequestId>,
    language: String,
}

impl AnnotationSession {
    /// Create an idle session checking the default language.
    pub fn new() -> Self {
        Self::with_language(DEFAULT_LANGUAGE)
    }

    /// Create an idle session checking the given language.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            state: SessionState::Idle,
            snapshot: None,
            matches: Vec::new(),
            next_request: 0,
            current_request: None,
            language: language.into(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Matches of the current pass, ordered by ascending offset (ties:
    /// shorter span first). Empty unless the session is Ready or
    /// Invalidated.
    pub fn matches(&self) -> &[AnnotationMatch] {
        &self.matches
    }

    /// The snapshot the current pass was analyzed against.
    pub fn snapshot(&self) -> Option<&FlattenedDocument> {
        self.snapshot.as_ref()
    }

    /// Start a new analysis pass over `raw_text`.
    ///
    /// Builds the flattened snapshot, clears previous matches, and returns
    /// the request id together with the wire request for the analysis
    /// collaborator. Any earlier in-flight request is superseded: completing
    /// it later is a no-op.
    pub fn begin_analysis(&mut self, raw_text: &str) -> (RequestId, AnalysisRequest) {
        let request_id = self.next_request;
        self.next_request += 1;
        self.current_request = Some(request_id);
        self.snapshot = Some(FlattenedDocument::from_text(raw_text));
        self.matches.clear();
        self.state = SessionState::Analyzing;
        let request = AnalysisRequest {
            text: raw_text.to_string(),
            language: self.language.clone(),
        };
        (request_id, request)
    }

    /// Install the response for `request_id`.
    ///
    /// Responses for superseded request ids are discarded. Matches whose
    /// span exceeds the snapshot length are dropped, never clamped; the rest
    /// are installed Pending, sorted by ascending offset with shorter spans
    /// first on ties (display order only).
    pub fn complete_analysis(
        &mut self,
        request_id: RequestId,
        response: AnalysisResponse,
    ) -> AnalysisOutcome {
        if self.state != SessionState::Analyzing || self.current_request != Some(request_id) {
            return AnalysisOutcome::Superseded;
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            return AnalysisOutcome::Superseded;
        };

        let total = response.matches.len();
        let mut kept: Vec<_> = response
            .matches
            .into_iter()
            .filter(|m| snapshot.contains_span(m.offset, m.length))
            .collect();
        kept.sort_by(|a, b| a.offset.cmp(&b.offset).then(a.length.cmp(&b.length)));
        let dropped = total - kept.len();

        let matches: Vec<AnnotationMatch> = kept
            .into_iter()
            .enumerate()
            .map(|(id, m)| AnnotationMatch {
                id,
                offset: m.offset,
                length: m.length,
                snippet: snapshot.slice(m.offset, m.length).unwrap_or("").to_string(),
                message: m.message,
                rule_id: m.rule.id,
                rule_description: m.rule.description,
                context: m.context.map(ContextExcerpt::from),
                suggestions: m.replacements.into_iter().map(|r| r.value).collect(),
                state: MatchState::Pending,
            })
            .collect();

        self.matches = matches;
        self.state = SessionState::Ready;
        AnalysisOutcome::Ready {
            match_count: self.matches.len(),
            dropped,
        }
    }

    /// Abandon the in-flight request `request_id`, returning to Idle.
    ///
    /// Ignored for superseded ids, so a late failure from an old request
    /// cannot disturb a newer pass.
    pub fn abort_analysis(&mut self, request_id: RequestId) {
        if self.state == SessionState::Analyzing && self.current_request == Some(request_id) {
            self.state = SessionState::Idle;
            self.snapshot = None;
        }
    }

    /// Apply suggestion `suggestion_index` of match `id` to the live
    /// document.
    ///
    /// The span is re-derived against a freshly captured snapshot of the
    /// host document. If the substring there no longer equals the one
    /// recorded at analysis time, the session transitions to Invalidated and
    /// [`ApplyOutcome::DocumentChanged`] is returned without mutating
    /// anything. Otherwise the replacement is applied, the match is marked
    /// Applied, and every other Pending match overlapping the edited span is
    /// marked Invalidated.
    pub fn apply_match(
        &mut self,
        host: &mut dyn HostEditor,
        id: MatchId,
        suggestion_index: usize,
    ) -> Result<ApplyOutcome, AssistError> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Analyzing => return Err(AssistError::Busy),
            SessionState::Idle | SessionState::Invalidated => {
                return Err(AssistError::StalePosition);
            }
        }

        let index = self
            .matches
            .iter()
            .position(|m| m.id == id && m.state == MatchState::Pending)
            .ok_or(AssistError::StalePosition)?;
        let replacement = self.matches[index]
            .suggestions
            .get(suggestion_index)
            .cloned()
            .ok_or(AssistError::OutOfRange)?;
        let (offset, length) = (self.matches[index].offset, self.matches[index].length);

        // Fresh snapshot immediately before applying.
        let live = FlattenedDocument::from_text(host.document_text());
        if live.slice(offset, length) != Some(self.matches[index].snippet.as_str()) {
            self.state = SessionState::Invalidated;
            return Ok(ApplyOutcome::DocumentChanged);
        }

        let start = live.position_of(offset)?;
        let end = live.position_of(offset + length)?;
        let caret = apply_replacement(host, start, end, &replacement)?;

        self.matches[index].state = MatchState::Applied;
        let mut invalidated = 0;
        for m in &mut self.matches {
            let overlaps = m.offset < offset + length && offset < m.offset + m.length;
            if m.state == MatchState::Pending && overlaps {
                m.state = MatchState::Invalidated;
                invalidated += 1;
            }
        }
        Ok(ApplyOutcome::Applied { caret, invalidated })
    }

    /// Dismiss a pending match. No document effect.
    pub fn dismiss_match(&mut self, id: MatchId) -> Result<(), AssistError> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Analyzing => return Err(AssistError::Busy),
            SessionState::Idle | SessionState::Invalidated => {
                return Err(AssistError::StalePosition);
            }
        }
        let entry = self
            .matches
            .iter_mut()
            .find(|m| m.id == id && m.state == MatchState::Pending)
            .ok_or(AssistError::StalePosition)?;
        entry.state = MatchState::Dismissed;
        Ok(())
    }

    /// End the session: release the snapshot, destroy the matches, return to
    /// Idle.
    pub fn finish(&mut self) {
        self.state = SessionState::Idle;
        self.snapshot = None;
        self.matches.clear();
        self.current_request = None;
    }
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}
