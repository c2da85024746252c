use std::sync::Once;

use hub_core::{
    ChatTranscript, ControlState, ConversationItem, Message, RequestError, Role, SaveAck,
    SaveEffect, SaveFailure, SaveFlow, SaveMsg, SaveRequest, SaveStage, DEFAULT_COLLECTION,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(hub_logging::initialize_for_tests);
}

fn item() -> ConversationItem {
    ConversationItem::new("/app/abc123", "Joins vs subqueries")
}

fn transcript() -> ChatTranscript {
    ChatTranscript::new(
        "Gemini",
        "https://gemini.google.com/app/abc123",
        vec![
            Message::new(Role::User, "what is a subquery"),
            Message::new(Role::Model, "A **subquery** is a query nested in another."),
        ],
    )
    .expect("non-empty transcript")
}

/// Drives a fresh flow up to the collection prompt.
fn flow_at_prompt() -> SaveFlow {
    let mut flow = SaveFlow::new(item());
    flow.apply(SaveMsg::Clicked);
    flow.apply(SaveMsg::Activated);
    flow.apply(SaveMsg::SettleElapsed);
    flow.apply(SaveMsg::Scraped(Some(transcript())));
    flow
}

fn submit_count(effects: &[SaveEffect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, SaveEffect::Submit(_)))
        .count()
}

#[test]
fn click_walks_through_every_stage_in_order() {
    init_logging();
    let mut flow = SaveFlow::new(item());
    assert_eq!(flow.control_state(), ControlState::Unsaved);

    assert_eq!(flow.apply(SaveMsg::Clicked), vec![SaveEffect::Activate(item())]);
    assert_eq!(flow.stage(), &SaveStage::Activating);
    assert_eq!(flow.control_state(), ControlState::Saving);

    assert_eq!(flow.apply(SaveMsg::Activated), vec![SaveEffect::WaitSettle]);
    assert_eq!(flow.stage(), &SaveStage::Waiting);

    assert_eq!(flow.apply(SaveMsg::SettleElapsed), vec![SaveEffect::Scrape]);
    assert_eq!(flow.stage(), &SaveStage::Scraping);

    assert_eq!(
        flow.apply(SaveMsg::Scraped(Some(transcript()))),
        vec![SaveEffect::PromptCollection {
            default: DEFAULT_COLLECTION.to_string()
        }]
    );

    let effects = flow.apply(SaveMsg::CollectionChosen(Some("Uncategorized".into())));
    assert_eq!(
        effects,
        vec![SaveEffect::Submit(SaveRequest {
            transcript: transcript(),
            collection: "Uncategorized".to_string(),
            sidebar_title: "Joins vs subqueries".to_string(),
        })]
    );
    assert_eq!(flow.stage(), &SaveStage::Submitting);

    let ack = SaveAck {
        status: Some("success".into()),
        message: None,
        database_id: Some(7),
    };
    assert_eq!(
        flow.apply(SaveMsg::Submitted(Ok(ack.clone()))),
        vec![SaveEffect::ReportSaved(ack)]
    );
    assert_eq!(flow.control_state(), ControlState::Saved);
}

#[test]
fn click_while_saving_is_ignored() {
    init_logging();
    let mut flow = SaveFlow::new(item());
    flow.apply(SaveMsg::Clicked);
    flow.apply(SaveMsg::Activated);

    assert!(flow.apply(SaveMsg::Clicked).is_empty());
    assert_eq!(flow.stage(), &SaveStage::Waiting);
}

#[test]
fn click_on_saved_control_does_nothing() {
    init_logging();
    let mut flow = flow_at_prompt();
    flow.apply(SaveMsg::CollectionChosen(Some("SQL Prep".into())));
    flow.apply(SaveMsg::Submitted(Ok(SaveAck::default())));
    let before = flow.clone();

    let effects = flow.apply(SaveMsg::Clicked);

    assert!(effects.is_empty());
    assert_eq!(flow, before);
}

#[test]
fn empty_scrape_fails_without_submitting() {
    init_logging();
    let mut flow = SaveFlow::new(item());
    flow.apply(SaveMsg::Clicked);
    flow.apply(SaveMsg::Activated);
    flow.apply(SaveMsg::SettleElapsed);

    let effects = flow.apply(SaveMsg::Scraped(None));

    assert_eq!(effects, vec![SaveEffect::ReportFailure(SaveFailure::ScrapeEmpty)]);
    assert_eq!(submit_count(&effects), 0);
    assert_eq!(flow.control_state(), ControlState::Failed);
    assert_eq!(flow.control_state().visual(), ControlState::Unsaved.visual());
}

#[test]
fn dismissed_prompt_issues_no_request() {
    init_logging();
    for answer in [None, Some(String::new()), Some("   ".to_string())] {
        let mut flow = flow_at_prompt();
        let effects = flow.apply(SaveMsg::CollectionChosen(answer));
        assert_eq!(
            effects,
            vec![SaveEffect::ReportFailure(SaveFailure::UserCancelled)]
        );
        assert_eq!(flow.last_failure(), Some(&SaveFailure::UserCancelled));
        assert!(flow.control_state().accepts_click());
    }
}

#[test]
fn collection_label_is_trimmed_but_not_validated() {
    init_logging();
    let mut flow = flow_at_prompt();
    let effects = flow.apply(SaveMsg::CollectionChosen(Some("  SQL Prep ".into())));
    match effects.as_slice() {
        [SaveEffect::Submit(request)] => assert_eq!(request.collection, "SQL Prep"),
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn network_failure_allows_retry_from_the_start() {
    init_logging();
    let mut flow = flow_at_prompt();
    flow.apply(SaveMsg::CollectionChosen(Some("Uncategorized".into())));

    let err = RequestError::network("connection refused");
    let effects = flow.apply(SaveMsg::Submitted(Err(err.clone())));
    assert_eq!(
        effects,
        vec![SaveEffect::ReportFailure(SaveFailure::Request(err))]
    );
    assert_eq!(flow.control_state(), ControlState::Failed);

    assert_eq!(flow.apply(SaveMsg::Clicked), vec![SaveEffect::Activate(item())]);
    assert_eq!(flow.stage(), &SaveStage::Activating);
}

#[test]
fn stale_messages_are_dropped() {
    init_logging();
    let mut flow = SaveFlow::new(item());
    assert!(flow.apply(SaveMsg::SettleElapsed).is_empty());
    assert!(flow
        .apply(SaveMsg::Submitted(Ok(SaveAck::default())))
        .is_empty());
    assert_eq!(flow.stage(), &SaveStage::Idle);
}

#[test]
fn custom_default_collection_is_suggested() {
    init_logging();
    let mut flow = SaveFlow::with_default_collection(item(), "Inbox");
    flow.apply(SaveMsg::Clicked);
    flow.apply(SaveMsg::Activated);
    flow.apply(SaveMsg::SettleElapsed);
    assert_eq!(
        flow.apply(SaveMsg::Scraped(Some(transcript()))),
        vec![SaveEffect::PromptCollection {
            default: "Inbox".to_string()
        }]
    );
}

#[test]
fn backend_known_chat_starts_out_saved() {
    init_logging();
    let mut flow = SaveFlow::new(item());

    assert!(flow.apply(SaveMsg::AlreadySaved).is_empty());
    assert_eq!(flow.control_state(), ControlState::Saved);
    assert!(flow.apply(SaveMsg::Clicked).is_empty());
}

#[test]
fn status_answer_does_not_interrupt_a_running_save() {
    init_logging();
    let mut flow = SaveFlow::new(item());
    flow.apply(SaveMsg::Clicked);

    assert!(flow.apply(SaveMsg::AlreadySaved).is_empty());
    assert_eq!(flow.stage(), &SaveStage::Activating);
}
