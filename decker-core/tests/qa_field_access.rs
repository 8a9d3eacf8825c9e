//! The generic field accessor: display, modify, and its error shapes.

use decker_core::testing::{test_session, CaptureWriter};
use decker_core::Session;
use serde_json::json;

async fn run_line(session: &mut Session, cap: &CaptureWriter, line: &str) -> String {
    cap.clear();
    session.handle_line(line);
    session.out.flushed().await;
    cap.plain()
}

#[tokio::test(start_paused = true)]
async fn scalar_fields_display_directly() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "strength").await;
    assert_eq!(text, "18\n");

    let text = run_line(&mut session, &cap, "name").await;
    assert_eq!(text, "Case\n");

    let text = run_line(&mut session, &cap, "inspiration").await;
    assert_eq!(text, "false\n");
}

#[tokio::test(start_paused = true)]
async fn array_fields_join_lines_and_empty_renders_placeholder() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "features").await;
    assert_eq!(text, "Rage\nReckless Attack\n");

    let text = run_line(&mut session, &cap, "notes").await;
    assert_eq!(text, "--empty--\n");

    session.store.set("features", json!([]));
    let text = run_line(&mut session, &cap, "features").await;
    assert_eq!(text, "--empty--\n");
}

#[tokio::test(start_paused = true)]
async fn numeric_field_deltas_and_absolutes() {
    let (mut session, cap) = test_session();

    // strength has no named command, so this is the generic path.
    let text = run_line(&mut session, &cap, "strength +2").await;
    assert!(text.contains("18 + 2"));
    assert!(text.contains("strength: 20"));
    assert_eq!(session.store.get_i64("strength"), Some(20));

    let text = run_line(&mut session, &cap, "strength -4").await;
    assert!(text.contains("20 - 4"));
    assert_eq!(session.store.get_i64("strength"), Some(16));

    let text = run_line(&mut session, &cap, "strength 18").await;
    assert!(text.contains("Previous strength: 16"));
    assert!(text.contains("strength: 18"));
    assert_eq!(session.store.get_i64("strength"), Some(18));
}

#[tokio::test(start_paused = true)]
async fn numeric_field_rejects_garbage() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "strength lots").await;
    assert_eq!(
        text,
        "Unknown modifier: lots. Expected similar to: -10 or +23\n"
    );
    assert_eq!(session.store.get_i64("strength"), Some(18));
}

#[tokio::test(start_paused = true)]
async fn string_field_replaces_and_appends() {
    let (mut session, cap) = test_session();

    run_line(&mut session, &cap, "notes jacked-in").await;
    assert_eq!(session.store.get_str("notes"), Some("jacked-in"));

    run_line(&mut session, &cap, "notes +\\nout-cold").await;
    assert_eq!(
        session.store.get_str("notes"),
        Some("jacked-in\nout-cold")
    );
}

#[tokio::test(start_paused = true)]
async fn boolean_field_accepts_only_the_four_tokens() {
    let (mut session, cap) = test_session();

    run_line(&mut session, &cap, "inspiration true").await;
    assert_eq!(session.store.get("inspiration"), Some(&json!(true)));

    run_line(&mut session, &cap, "inspiration 0").await;
    assert_eq!(session.store.get("inspiration"), Some(&json!(false)));

    let text = run_line(&mut session, &cap, "inspiration maybe").await;
    assert_eq!(
        text,
        "Unknown value: maybe. Expected one of: 1, 0, true, false\n"
    );
    assert_eq!(session.store.get("inspiration"), Some(&json!(false)));
}

#[tokio::test(start_paused = true)]
async fn unknown_name_matches_neither_command_nor_field() {
    let (mut session, cap) = test_session();

    let text = run_line(&mut session, &cap, "frobnicate 5").await;
    assert_eq!(text, "Unknown command: frobnicate\n");
}
