use super::*;
use crate::test_support::{dataset, token, FakeService};

#[test]
fn upload_accepts_spreadsheet_extensions_only() {
    assert!(UploadFile::new("students.csv", b"a,b".to_vec()).validate().is_ok());
    assert!(UploadFile::new("Students.XLSX", Vec::new()).validate().is_ok());
    assert!(UploadFile::new("legacy.xls", Vec::new()).validate().is_ok());

    let err = UploadFile::new("notes.txt", Vec::new())
        .validate()
        .expect_err("txt rejected");
    assert_eq!(
        err.to_string(),
        "Invalid file type. Allowed types: csv, xlsx, xls"
    );
    assert!(UploadFile::new("", Vec::new()).validate().is_err());
    assert!(UploadFile::new("noextension", Vec::new()).validate().is_err());
}

#[test]
fn upload_rejects_oversized_files() {
    let file = UploadFile::new("big.csv", vec![0; MAX_UPLOAD_BYTES + 1]);
    assert!(matches!(
        file.validate(),
        Err(ActionError::InvalidUpload(_))
    ));
}

#[tokio::test]
async fn invalid_upload_never_reaches_the_service() {
    let service = Arc::new(FakeService::new(dataset(3)));
    let dispatcher = ActionDispatcher::new(service.clone());

    let err = dispatcher
        .upload(&UploadFile::new("photo.png", Vec::new()))
        .await
        .expect_err("rejected");
    assert!(err.is_client_side());
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn requests_carry_the_requested_index() {
    let service = Arc::new(FakeService::new(dataset(3)));
    let dispatcher = ActionDispatcher::new(service.clone());
    let token = token("t");

    dispatcher.generate_one(&token, 2).await.expect("artifact");
    dispatcher.notify_one(&token, 1).await.expect("sent");
    dispatcher.generate_all(&token).await.expect("archive");

    assert_eq!(
        service.calls(),
        vec![
            (Operation::GenerateOne, Some(2)),
            (Operation::NotifyOne, Some(1)),
            (Operation::GenerateAll, None),
        ]
    );
    assert!(dispatcher.inflight().is_empty());
}

#[tokio::test]
async fn duplicate_trigger_is_rejected_while_first_is_outstanding() {
    let (service, gate) = FakeService::new(dataset(3)).gated();
    let service = Arc::new(service);
    let dispatcher = Arc::new(ActionDispatcher::new(service.clone()));

    let first = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move { dispatcher.notify_one(&token("t"), 1).await })
    };
    service.entered.notified().await;

    let duplicate = dispatcher
        .notify_one(&token("t"), 1)
        .await
        .expect_err("busy");
    assert_eq!(
        duplicate,
        ActionError::Busy {
            key: ActionKey::one(Operation::NotifyOne, 1)
        }
    );

    gate.notify_one();
    first.await.expect("join").expect("first completes");
    assert_eq!(service.call_count(), 1);
    assert!(dispatcher.inflight().is_empty());
}

#[tokio::test]
async fn guard_is_released_when_the_service_fails() {
    let mut service = FakeService::new(dataset(1));
    service.notify_one = Err(ActionError::Service {
        message: "SMTP down".into(),
    });
    let dispatcher = ActionDispatcher::new(Arc::new(service));

    let err = dispatcher
        .notify_one(&token("t"), 0)
        .await
        .expect_err("service error");
    assert_eq!(err.to_string(), "SMTP down");
    assert!(!err.is_client_side());
    assert!(dispatcher.inflight().is_empty());
}
