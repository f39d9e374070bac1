use super::*;
use crate::test_support::{dataset, token};

#[test]
fn empty_store_has_no_session() {
    let store = SessionStore::new();
    assert_eq!(store.require_token(), Err(ActionError::MissingSession));
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.page_count(), 1);
    assert!(store.window().is_empty());
}

#[test]
fn require_token_fails_for_an_empty_dataset_even_with_a_token() {
    let mut store = SessionStore::new();
    store.set_dataset(Vec::new(), token("t-empty"));
    assert_eq!(store.require_token(), Err(ActionError::MissingSession));

    store.set_dataset(dataset(1), token("t-one"));
    assert_eq!(store.require_token().expect("token").as_str(), "t-one");

    store.clear();
    assert_eq!(store.require_token(), Err(ActionError::MissingSession));
    assert!(store.token().is_none());
}

#[test]
fn set_dataset_resets_page_and_statuses() {
    let mut store = SessionStore::new();
    store.set_dataset(dataset(25), token("first"));
    store.set_page(3);
    store.set_status(4, NotificationStatus::Sent);
    store.set_status(21, NotificationStatus::Failed);

    store.set_dataset(dataset(12), token("second"));
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.statuses().len(), 12);
    assert!(store
        .statuses()
        .iter()
        .all(|status| *status == NotificationStatus::Unsent));
    assert_eq!(store.require_token().expect("token").as_str(), "second");
}

#[test]
fn every_replacement_bumps_the_generation() {
    let mut store = SessionStore::new();
    let first = store.set_dataset(dataset(3), token("a"));
    let second = store.set_dataset(dataset(3), token("b"));
    assert!(second > first);
    store.clear();
    assert!(store.generation() > second);
}

#[test]
fn page_changes_are_clamped() {
    let mut store = SessionStore::new();
    store.set_dataset(dataset(25), token("t"));
    assert_eq!(store.set_page(0), 1);
    assert_eq!(store.set_page(9), 3);
    assert_eq!(store.next_page(), 3);
    assert_eq!(store.previous_page(), 2);
    assert_eq!(store.previous_page(), 1);
    assert_eq!(store.previous_page(), 1);
}

#[test]
fn local_rows_resolve_against_the_current_page() {
    let mut store = SessionStore::new();
    store.set_dataset(dataset(25), token("t"));
    store.set_page(3);
    assert_eq!(store.resolve_local(0), Some(20));
    assert_eq!(store.resolve_local(4), Some(24));
    assert_eq!(store.resolve_local(5), None);
    assert_eq!(store.window()[4].name, "Student 24");
}

#[test]
fn out_of_range_records_are_reported() {
    let mut store = SessionStore::new();
    store.set_dataset(dataset(2), token("t"));
    assert_eq!(
        store.checked_record(2),
        Err(ActionError::InvalidIndex { index: 2, len: 2 })
    );
    assert!(!store.set_status(2, NotificationStatus::Sent));
}

#[test]
fn transition_applies_only_from_the_expected_status() {
    let mut store = SessionStore::new();
    store.set_dataset(dataset(2), token("t"));
    store.set_status(0, NotificationStatus::Sent);

    assert!(!store.transition(0, NotificationStatus::Sending, NotificationStatus::Failed));
    assert_eq!(store.status(0), Some(NotificationStatus::Sent));

    assert!(store.transition(1, NotificationStatus::Unsent, NotificationStatus::Sending));
    assert_eq!(store.status(1), Some(NotificationStatus::Sending));
    assert!(!store.transition(2, NotificationStatus::Unsent, NotificationStatus::Sent));
}
