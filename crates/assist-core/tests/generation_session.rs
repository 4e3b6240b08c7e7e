use assist_core::{
    AssistError, GenerationAction, GenerationOutcome, GenerationPreset, GenerationSession,
    HostEditor, PadBuffer, Position,
};

#[test]
fn test_begin_captures_selection() {
    let mut pad = PadBuffer::from_text("alpha beta gamma");
    pad.set_selection(Position::new(0, 6), Position::new(0, 10))
        .unwrap();

    let mut session = GenerationSession::new();
    let request = session
        .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
        .unwrap();
    assert_eq!(request.source_text, "beta");
    assert_eq!(request.instruction, "Rewrite for clarity");
    assert!(session.is_busy());
}

#[test]
fn test_empty_selection_falls_back_to_cursor_line() {
    let mut pad = PadBuffer::from_text("first line\nsecond line");
    pad.set_selection(Position::new(1, 4), Position::new(1, 4))
        .unwrap();

    let mut session = GenerationSession::new();
    let request = session
        .begin(&pad, GenerationPreset::Summarize, None, None)
        .unwrap();
    assert_eq!(request.source_text, "second line");
    assert_eq!(request.instruction, "Summarize");
}

#[test]
fn test_multi_line_selection_keeps_newlines() {
    let mut pad = PadBuffer::from_text("one\ntwo\nthree");
    pad.set_selection(Position::new(0, 0), Position::new(1, 3))
        .unwrap();

    let mut session = GenerationSession::new();
    let request = session
        .begin(&pad, GenerationPreset::Shorten, None, None)
        .unwrap();
    assert_eq!(request.source_text, "one\ntwo");
}

#[test]
fn test_blank_input_fails_fast() {
    let pad = PadBuffer::from_text("   \nmore");
    let mut session = GenerationSession::new();
    let result = session.begin(&pad, GenerationPreset::Expand, None, None);
    assert_eq!(result.unwrap_err(), AssistError::NoInputSelected);
    assert!(!session.is_busy());
}

#[test]
fn test_custom_instruction_wins_over_preset() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    let request = session
        .begin(
            &pad,
            GenerationPreset::FixGrammar,
            Some("  Translate to French  "),
            None,
        )
        .unwrap();
    assert_eq!(request.instruction, "Translate to French");
}

#[test]
fn test_blank_custom_instruction_falls_back_to_preset() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    let request = session
        .begin(&pad, GenerationPreset::ImproveTone, Some("   "), None)
        .unwrap();
    assert_eq!(request.instruction, "Improve tone");
}

#[test]
fn test_concurrent_generation_is_rejected() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    session
        .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
        .unwrap();

    let result = session.begin(&pad, GenerationPreset::RewriteForClarity, None, None);
    assert_eq!(result.unwrap_err(), AssistError::Busy);
    assert!(session.is_busy());
}

#[test]
fn test_replace_applies_at_captured_range() {
    let mut pad = PadBuffer::from_text("keep THIS keep");
    pad.set_selection(Position::new(0, 5), Position::new(0, 9))
        .unwrap();

    let mut session = GenerationSession::new();
    session
        .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
        .unwrap();
    session.complete("that".to_string());
    assert!(!session.is_busy());
    assert_eq!(session.result_text(), Some("that"));

    let outcome = session.apply(&mut pad, GenerationAction::Replace).unwrap();
    assert_eq!(pad.text(), "keep that keep");
    assert_eq!(
        outcome,
        GenerationOutcome::Applied {
            caret: Position::new(0, 9)
        }
    );
    // Terminal action ends the session.
    assert_eq!(session.result_text(), None);
}

#[test]
fn test_insert_below_adds_a_new_line_after_capture() {
    let mut pad = PadBuffer::from_text("first\nsecond\nthird");
    pad.set_selection(Position::new(1, 0), Position::new(1, 6))
        .unwrap();

    let mut session = GenerationSession::new();
    session
        .begin(&pad, GenerationPreset::Expand, None, None)
        .unwrap();
    session.complete("generated".to_string());

    let outcome = session
        .apply(&mut pad, GenerationAction::InsertBelow)
        .unwrap();
    assert_eq!(pad.text(), "first\nsecond\ngenerated\nthird");
    assert_eq!(
        outcome,
        GenerationOutcome::Applied {
            caret: Position::new(2, 9)
        }
    );
}

#[test]
fn test_copy_hands_text_back_without_mutation() {
    let mut pad = PadBuffer::from_text("original");
    let mut session = GenerationSession::new();
    session
        .begin(&pad, GenerationPreset::Summarize, None, None)
        .unwrap();
    session.complete("summary".to_string());

    let outcome = session.apply(&mut pad, GenerationAction::Copy).unwrap();
    assert_eq!(
        outcome,
        GenerationOutcome::Copy {
            text: "summary".to_string()
        }
    );
    assert_eq!(pad.text(), "original");
}

#[test]
fn test_fail_clears_busy_on_every_error() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();

    for error in [
        AssistError::Timeout,
        AssistError::ConnectionFailed,
        AssistError::HttpError { status: 502 },
    ] {
        session
            .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
            .unwrap();
        assert!(session.is_busy());
        let returned = session.fail(error.clone());
        assert_eq!(returned, error);
        assert!(!session.is_busy());
    }
}

#[test]
fn test_apply_without_result_is_rejected() {
    let mut pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    assert_eq!(
        session.apply(&mut pad, GenerationAction::Replace),
        Err(AssistError::StalePosition)
    );

    session
        .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
        .unwrap();
    assert_eq!(
        session.apply(&mut pad, GenerationAction::Copy),
        Err(AssistError::Busy)
    );
    assert!(session.is_busy());
}

#[test]
fn test_late_completion_after_failure_is_ignored() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    session
        .begin(&pad, GenerationPreset::RewriteForClarity, None, None)
        .unwrap();
    session.fail(AssistError::Timeout);

    session.complete("late result".to_string());
    assert_eq!(session.result_text(), None);
    assert!(!session.is_busy());
}

#[test]
fn test_model_override_is_forwarded() {
    let pad = PadBuffer::from_text("some text");
    let mut session = GenerationSession::new();
    let request = session
        .begin(
            &pad,
            GenerationPreset::RewriteForClarity,
            None,
            Some("anthropic/claude-3-haiku".to_string()),
        )
        .unwrap();
    assert_eq!(
        request.model_override.as_deref(),
        Some("anthropic/claude-3-haiku")
    );
}
