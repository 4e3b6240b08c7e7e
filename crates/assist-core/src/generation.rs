//! Generation session: one generate-and-apply workflow.
//!
//! Captures the user's selection (or the cursor's line when the selection is
//! empty), hands a provider-bound request to the caller, records the
//! provider outcome, and executes exactly one terminal action: replace the
//! captured range, insert below it, or hand the text back for the host
//! clipboard. One generation may be in flight per session instance.

use crate::error::AssistError;
use crate::patch::{HostEditor, apply_replacement};
use crate::position::{FlattenedDocument, Position};

/// Preset instructions offered by the host UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationPreset {
    /// Rewrite the text for clarity.
    #[default]
    RewriteForClarity,
    /// Make the text shorter.
    Shorten,
    /// Make the text longer.
    Expand,
    /// Fix grammatical errors.
    FixGrammar,
    /// Improve the tone of the text.
    ImproveTone,
    /// Summarize the text.
    Summarize,
}

impl GenerationPreset {
    /// The instruction text sent to the provider.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::RewriteForClarity => "Rewrite for clarity",
            Self::Shorten => "Shorten",
            Self::Expand => "Expand",
            Self::FixGrammar => "Fix grammar",
            Self::ImproveTone => "Improve tone",
            Self::Summarize => "Summarize",
        }
    }
}

/// A provider-bound request produced when a generation begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Instruction for the model: the custom override when one was given,
    /// otherwise the preset text.
    pub instruction: String,
    /// The captured source text.
    pub source_text: String,
    /// Model overriding the provider's configured default, if any.
    pub model_override: Option<String>,
}

/// Terminal actions on a completed generation. Each ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationAction {
    /// Replace the originally captured range with the generated text.
    Replace,
    /// Insert the generated text as a new line after the captured range.
    InsertBelow,
    /// Hand the generated text back for the host clipboard.
    Copy,
}

/// Result of a terminal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Text was written into the document; the caret sits just after it.
    Applied {
        /// Caret position after the inserted text.
        caret: Position,
    },
    /// Text handed back for the host clipboard.
    Copy {
        /// The generated text.
        text: String,
    },
}

/// The range whose text was captured when the generation began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedRange {
    /// Start of the captured range (inclusive).
    pub start: Position,
    /// End of the captured range (exclusive).
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenState {
    Idle,
    Busy { captured: CapturedRange },
    Completed { captured: CapturedRange, text: String },
}

/// A stateful orchestrator for one generate-and-apply workflow.
///
/// Owned and passed by the caller. States: `Idle → Busy → Completed → Idle`,
/// with `fail` collapsing Busy back to Idle. The busy flag is cleared on
/// every exit path.
pub struct GenerationSession {
    state: GenState,
}

impl GenerationSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self {
            state: GenState::Idle,
        }
    }

    /// Whether a generation is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, GenState::Busy { .. })
    }

    /// The completed result text, if any.
    pub fn result_text(&self) -> Option<&str> {
        match &self.state {
            GenState::Completed { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The range captured when the current workflow began, if any.
    pub fn captured_range(&self) -> Option<CapturedRange> {
        match &self.state {
            GenState::Busy { captured } | GenState::Completed { captured, .. } => Some(*captured),
            GenState::Idle => None,
        }
    }

    /// Capture the selection and enter the busy state.
    ///
    /// When the selection is empty the cursor's whole line is captured
    /// instead. A non-blank `custom_instruction` wins over `preset`. Fails
    /// with [`AssistError::Busy`] while a generation is in flight and with
    /// [`AssistError::NoInputSelected`] when the captured text is blank; in
    /// both cases no request is produced, so the caller issues no network
    /// call. The caller passes the returned request to a provider and
    /// reports back through [`complete`](Self::complete) or
    /// [`fail`](Self::fail).
    pub fn begin(
        &mut self,
        host: &dyn HostEditor,
        preset: GenerationPreset,
        custom_instruction: Option<&str>,
        model_override: Option<String>,
    ) -> Result<GenerationRequest, AssistError> {
        if self.is_busy() {
            return Err(AssistError::Busy);
        }
        let (captured, source_text) = capture_source(host)?;
        let instruction = match custom_instruction {
            Some(custom) if !custom.trim().is_empty() => custom.trim().to_string(),
            _ => preset.instruction().to_string(),
        };
        self.state = GenState::Busy { captured };
        Ok(GenerationRequest {
            instruction,
            source_text,
            model_override,
        })
    }

    /// Record a successful provider response, leaving the completed state.
    ///
    /// Ignored unless a generation is in flight, so a response that outlived
    /// its workflow cannot resurrect a finished session.
    pub fn complete(&mut self, text: String) {
        if let GenState::Busy { captured } = self.state {
            self.state = GenState::Completed { captured, text };
        }
    }

    /// Record a failed provider call, clear the busy state, and hand the
    /// error back for presentation.
    pub fn fail(&mut self, error: AssistError) -> AssistError {
        if self.is_busy() {
            self.state = GenState::Idle;
        }
        error
    }

    /// Execute a terminal action on the completed result. Ends the session.
    ///
    /// `Replace` reuses the range captured when the generation began without
    /// re-validating it against the live document; an edit made during the
    /// round trip can shift where the replacement lands. Fails with
    /// [`AssistError::Busy`] while the provider call is still in flight and
    /// with [`AssistError::StalePosition`] when there is no completed result
    /// to act on.
    pub fn apply(
        &mut self,
        host: &mut dyn HostEditor,
        action: GenerationAction,
    ) -> Result<GenerationOutcome, AssistError> {
        let (captured, text) = match std::mem::replace(&mut self.state, GenState::Idle) {
            GenState::Completed { captured, text } => (captured, text),
            GenState::Busy { captured } => {
                self.state = GenState::Busy { captured };
                return Err(AssistError::Busy);
            }
            GenState::Idle => return Err(AssistError::StalePosition),
        };

        match action {
            GenerationAction::Replace => {
                let caret = apply_replacement(host, captured.start, captured.end, &text)?;
                Ok(GenerationOutcome::Applied { caret })
            }
            GenerationAction::InsertBelow => {
                let live = FlattenedDocument::from_text(host.document_text());
                let line = captured.end.line.min(live.line_count().saturating_sub(1));
                let at = Position::new(line, live.line_length(line).unwrap_or(0));
                let caret = apply_replacement(host, at, at, &format!("\n{text}"))?;
                Ok(GenerationOutcome::Applied { caret })
            }
            GenerationAction::Copy => Ok(GenerationOutcome::Copy { text }),
        }
    }
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture the selection, or the cursor's whole line when the selection is
/// empty. Blank captures fail with [`AssistError::NoInputSelected`].
fn capture_source(host: &dyn HostEditor) -> Result<(CapturedRange, String), AssistError> {
    let live = FlattenedDocument::from_text(host.document_text());
    let (start, end) = host.selection();

    let (captured, text) = if start == end {
        let line = start.line.min(live.line_count().saturating_sub(1));
        let length = live.line_length(line).unwrap_or(0);
        let range = CapturedRange {
            start: Position::new(line, 0),
            end: Position::new(line, length),
        };
        let offset = live.offset_of(range.start)?;
        let text = live.slice(offset, length).unwrap_or("").to_string();
        (range, text)
    } else {
        let start_offset = live.offset_of(start).map_err(|_| AssistError::StalePosition)?;
        let end_offset = live.offset_of(end).map_err(|_| AssistError::StalePosition)?;
        if end_offset < start_offset {
            return Err(AssistError::StalePosition);
        }
        let text = live
            .slice(start_offset, end_offset - start_offset)
            .unwrap_or("")
            .to_string();
        (CapturedRange { start, end }, text)
    };

    if text.trim().is_empty() {
        return Err(AssistError::NoInputSelected);
    }
    Ok((captured, text))
}
