//! End-to-end session flow: output ordering, modal dialogues, routing.

use decker_core::testing::{test_session, CaptureWriter};
use decker_core::{Session, DEFAULT_LABEL};

async fn run_line(session: &mut Session, cap: &CaptureWriter, line: &str) -> String {
    cap.clear();
    session.handle_line(line);
    session.out.flushed().await;
    cap.plain()
}

#[tokio::test(start_paused = true)]
async fn writes_coalesce_into_one_completion() {
    let (session, cap) = test_session();

    let first = session.out.write("one");
    let second = session.out.write("two");
    let third = session.out.write("three");

    first.await;
    assert_eq!(cap.plain(), "one\ntwo\nthree\n");
    assert!(session.out.pending().is_none());

    // The later handles are the same completion and resolve immediately.
    second.await;
    third.await;
}

#[tokio::test(start_paused = true)]
async fn lines_during_animation_have_no_effect() {
    let (mut session, cap) = test_session();

    let busy = session.out.write("thinking...");
    session.handle_line("gold +25");
    session.handle_line("exit");
    busy.await;

    assert_eq!(session.store.get_i64("gold"), Some(50));
    assert!(!session.exit_requested());
    assert_eq!(cap.plain(), "thinking...\n");
}

#[tokio::test(start_paused = true)]
async fn alignment_selector_is_a_modal_dialogue() {
    let (mut session, cap) = test_session();

    // Bare -m flag opens the selector.
    let text = run_line(&mut session, &cap, "alignment -m").await;
    assert!(text.contains("Choose an alignment:"));
    assert!(text.contains("lawful good (lg)"));
    assert!(text.contains("chaotic evil (ce)"));
    assert_eq!(session.prompt_label(), "alignment = ");

    // An invalid choice keeps the block alive.
    let text = run_line(&mut session, &cap, "sort of good").await;
    assert!(text.contains("Please enter one of the available alignments"));
    assert_eq!(session.prompt_label(), "alignment = ");

    // A shortcut resolves, sets the field, and unwinds the block.
    let text = run_line(&mut session, &cap, "ne").await;
    assert!(text.contains("Changed alignment to neutral evil"));
    assert_eq!(session.prompt_label(), DEFAULT_LABEL);
    assert_eq!(
        session.store.get("alignment"),
        Some(&serde_json::json!("neutral evil"))
    );

    // The next line goes through normal command parsing again.
    let text = run_line(&mut session, &cap, "alignment").await;
    assert_eq!(text, "neutral evil\n");
}

#[tokio::test(start_paused = true)]
async fn alignment_sets_directly_from_a_flag_value() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "alignment --modify lg").await;
    assert!(text.contains("Changed alignment to lawful good"));
    assert!(!session.stack.is_active());
}

#[tokio::test(start_paused = true)]
async fn invalid_direct_set_falls_through_to_the_selector() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "alignment -m wibble").await;
    assert!(text.contains("Invalid alignment type"));
    assert!(text.contains("Choose an alignment:"));
    assert_eq!(session.prompt_label(), "alignment = ");
}

#[tokio::test(start_paused = true)]
async fn nesting_two_blocks_unwinds_in_two_exits() {
    let (mut session, _cap) = test_session();

    session.stack.enter("X = ", Box::new(|_, _| {}));
    session.stack.enter("Y = ", Box::new(|_, _| {}));
    assert_eq!(session.prompt_label(), "Y = ");

    session.stack.exit();
    assert_eq!(session.prompt_label(), "X = ");
    session.stack.exit();
    assert_eq!(session.prompt_label(), DEFAULT_LABEL);

    // Exiting an empty stack stays a no-op.
    session.stack.exit();
    assert_eq!(session.prompt_label(), DEFAULT_LABEL);
}

#[tokio::test(start_paused = true)]
async fn unknown_command_is_informational_not_fatal() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "frobnicate").await;
    assert_eq!(text, "Unknown command: frobnicate\n");

    // The session keeps working afterwards.
    let text = run_line(&mut session, &cap, "gold").await;
    assert_eq!(text, "GP: 50\n");
}

#[tokio::test(start_paused = true)]
async fn exit_is_a_clean_request() {
    let (mut session, _cap) = test_session();
    session.handle_line("exit");
    assert!(session.exit_requested());
}

#[tokio::test(start_paused = true)]
async fn help_flag_prints_usage_and_nothing_else() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "alignment --help").await;
    assert!(text.contains("Display or modify the character's alignment"));
    assert!(!session.stack.is_active());
    assert_eq!(
        session.store.get("alignment"),
        Some(&serde_json::json!("chaotic good"))
    );
}
