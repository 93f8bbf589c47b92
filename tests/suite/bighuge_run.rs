//! Full runs against a mocked Big Huge Thesaurus.

use std::time::Duration;

use lawyerify_engine::{
    MemorySurface, OverrideTable, QUOTA_NOTICE, ReplacePolicy, Replacer, RunError, RunStatus,
    SessionState, TokenOutcome,
};
use serde_json::json;

use crate::common::{
    client_for, mount_delayed_entry, mount_entry, mount_fallback_not_found, mount_status,
    start_thesaurus_mock,
};

#[tokio::test]
async fn happy_dog_gets_longest_synonym_and_old_text() {
    let server = start_thesaurus_mock().await;
    mount_entry(
        &server,
        "happy",
        json!({"adjective": {"syn": ["joyful", "content"], "ant": ["unhappy"]}}),
    )
    .await;
    mount_fallback_not_found(&server).await;

    let replacer = Replacer::new(client_for(&server));
    let mut surface = MemorySurface::new("The dog is happy.");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(
        surface.as_str(),
        "The dog is content.\n\n\nOLD TEXT: The dog is happy."
    );
    assert_eq!(report.lookups, 4);
}

#[tokio::test]
async fn repeated_words_share_one_request() {
    let server = start_thesaurus_mock().await;
    // `mount_entry` expects exactly one hit; verified when the server drops.
    mount_entry(
        &server,
        "happy",
        json!({"adjective": {"syn": ["felicitous"]}}),
    )
    .await;
    mount_fallback_not_found(&server).await;

    let replacer = Replacer::new(client_for(&server));
    let mut surface = MemorySurface::new("Happy people are happy.");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.rewritten, "Felicitous people are felicitous.");
    assert_eq!(report.tally.get(TokenOutcome::Replaced), 2);
}

#[tokio::test]
async fn similar_terms_stand_in_for_missing_synonyms() {
    let server = start_thesaurus_mock().await;
    mount_entry(
        &server,
        "big",
        json!({"adjective": {"sim": ["enormous", "large"]}}),
    )
    .await;
    mount_fallback_not_found(&server).await;

    let replacer = Replacer::new(client_for(&server));
    let mut surface = MemorySurface::new("a big deal");
    let report = replacer.run(&mut surface).await.expect("run");
    assert_eq!(report.rewritten, "a enormous deal");
}

#[tokio::test]
async fn strict_and_lenient_runs_differ_on_ambiguous_words() {
    let server = start_thesaurus_mock().await;
    let body = json!({
        "noun": {"syn": ["appointment"]},
        "verb": {"syn": ["go out"]}
    });
    mount_delayed_entry(&server, "date", body, Duration::ZERO).await;

    let replacer = Replacer::new(client_for(&server));

    let mut strict = MemorySurface::new("date");
    let report = replacer.run(&mut strict).await.expect("strict run");
    assert_eq!(report.rewritten, "date");
    assert_eq!(report.tally.get(TokenOutcome::AmbiguousSkipped), 1);

    replacer.set_policy(ReplacePolicy {
        strict_ambiguity: false,
        ..ReplacePolicy::default()
    });
    let mut lenient = MemorySurface::new("date");
    let report = replacer.run(&mut lenient).await.expect("lenient run");
    assert_eq!(report.rewritten, "appointment");
}

#[tokio::test]
async fn server_errors_other_than_quota_leave_words_alone() {
    let server = start_thesaurus_mock().await;
    mount_status(&server, "dog", 502).await;
    mount_entry(&server, "big", json!({"adjective": {"syn": ["enormous"]}})).await;

    let replacer = Replacer::new(client_for(&server)).with_overrides(OverrideTable::empty());
    let mut surface = MemorySurface::new("big dog");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.rewritten, "enormous dog");
    assert_eq!(report.tally.get(TokenOutcome::TransportFailure), 1);
}

#[tokio::test]
async fn quota_refusal_interrupts_the_session() {
    let server = start_thesaurus_mock().await;
    mount_entry(&server, "big", json!({"adjective": {"syn": ["enormous"]}})).await;
    mount_delayed_entry(
        &server,
        "dog",
        json!({"noun": {"syn": ["canine"]}}),
        Duration::from_millis(300),
    )
    .await;
    mount_status(&server, "cat", 500).await;

    let replacer = Replacer::new(client_for(&server));

    // "cat" fails before "dog" answers; "big" is near-instant.
    let mut surface = MemorySurface::new("big dog cat");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.status, RunStatus::Interrupted);
    assert!(surface.as_str().ends_with(&format!("\n\n\n {QUOTA_NOTICE}")));
    assert!(surface.as_str().contains("OLD TEXT: big dog cat"));
    assert!(!report.rewritten.contains("canine"));
    assert_eq!(replacer.state(), SessionState::Interrupted);

    let mut again = MemorySurface::new("big");
    assert!(matches!(
        replacer.run(&mut again).await,
        Err(RunError::Interrupted)
    ));

    // Let the straggler land; the presented text must not change.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(surface.writes(), 1);
    assert!(!surface.as_str().contains("canine"));
}
