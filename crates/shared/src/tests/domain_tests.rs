use super::*;

fn record_named(name: &str) -> Record {
    Record {
        name: name.to_string(),
        ..Record::default()
    }
}

#[test]
fn artifact_filename_collapses_whitespace_runs() {
    assert_eq!(
        record_named("Ada  Lovelace").artifact_filename(),
        "offer_letter_Ada_Lovelace.pdf"
    );
    assert_eq!(
        record_named("Jean\tPaul Sartre").artifact_filename(),
        "offer_letter_Jean_Paul_Sartre.pdf"
    );
}

#[test]
fn artifact_filename_never_contains_path_separators() {
    assert_eq!(
        record_named("a/b\\c").artifact_filename(),
        "offer_letter_a_b_c.pdf"
    );
}

#[test]
fn blank_email_is_not_a_contact_address() {
    let mut record = record_named("x");
    assert_eq!(record.contact_address(), None);
    record.email = Some("   ".into());
    assert_eq!(record.contact_address(), None);
    record.email = Some(" x@example.org ".into());
    assert_eq!(record.contact_address(), Some("x@example.org"));
}

#[test]
fn lenient_fields_accept_numbers_and_text() {
    let record: Record = serde_json::from_value(serde_json::json!({
        "name": "Grace Hopper",
        "email": "grace@example.org",
        "nationality": "US",
        "program": "MSc Computing",
        "duration": 2,
        "tuition_fee": "$12,500",
        "first_year_total": 13000.5
    }))
    .expect("record");

    assert_eq!(record.duration.as_deref(), Some("2"));
    assert_eq!(record.tuition_fee, Some(12500.0));
    assert_eq!(record.first_year_total, Some(13000.5));
    assert_eq!(record.tuition(), Some(12500.0));
}

#[test]
fn legacy_fee_is_used_as_tuition() {
    let record: Record = serde_json::from_value(serde_json::json!({
        "name": "Alan Turing",
        "nationality": "UK",
        "program": "PhD Mathematics",
        "fee": 2000
    }))
    .expect("legacy record");

    assert_eq!(record.email, None);
    assert_eq!(record.tuition(), Some(2000.0));
    assert_eq!(record.duration, None);
}

#[test]
fn session_token_rejects_blank_values() {
    assert_eq!(
        SessionToken::parse("  "),
        Err(ProtocolError::EmptySessionToken)
    );
    assert_eq!(SessionToken::parse("abc").expect("token").as_str(), "abc");
}

#[test]
fn only_unsent_or_failed_records_can_be_notified() {
    assert!(NotificationStatus::Unsent.can_notify());
    assert!(NotificationStatus::Failed.can_notify());
    assert!(!NotificationStatus::Sending.can_notify());
    assert!(!NotificationStatus::Sent.can_notify());
}
