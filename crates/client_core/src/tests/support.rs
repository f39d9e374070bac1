//! Fixtures shared by the unit tests.

use std::{
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{DeliveryStatus, Record, SessionToken},
    protocol::{NotifyAllResponse, NotifyDetail},
};
use tokio::sync::Notify;

use crate::{
    dispatcher::{Artifact, OfferService, UploadFile, UploadOutcome},
    error::ActionError,
    inflight::Operation,
    sink::ArtifactSink,
};

pub fn record(name: &str, email: Option<&str>) -> Record {
    Record {
        name: name.to_string(),
        email: email.map(str::to_string),
        nationality: "Testland".into(),
        program: "BSc Testing".into(),
        duration: Some("3".into()),
        tuition_fee: Some(1000.0),
        first_year_total: Some(1250.0),
        fee: None,
    }
}

/// `n` records named `Student <i>` with `student<i>@example.org`.
pub fn dataset(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let email = format!("student{i}@example.org");
            record(&format!("Student {i}"), Some(email.as_str()))
        })
        .collect()
}

pub fn token(raw: &str) -> SessionToken {
    SessionToken::parse(raw).expect("token")
}

pub fn detail(record: &Record, status: DeliveryStatus) -> NotifyDetail {
    NotifyDetail {
        name: record.name.clone(),
        email: record.email.clone(),
        status,
    }
}

pub struct FakeService {
    calls: Mutex<Vec<(Operation, Option<usize>)>>,
    pub upload: Result<UploadOutcome, ActionError>,
    pub artifact: Result<Artifact, ActionError>,
    pub notify_one: Result<String, ActionError>,
    pub notify_all: Result<NotifyAllResponse, ActionError>,
    /// When set, calls wait for a permit before replying.
    pub gate: Option<Arc<Notify>>,
    /// Restricts the gate to one operation.
    gated_operation: Option<Operation>,
    pub entered: Arc<Notify>,
}

impl FakeService {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            upload: Ok(UploadOutcome {
                message: format!("Successfully processed {} student records", records.len()),
                records,
                token: token("data-1"),
            }),
            artifact: Ok(Artifact {
                bytes: b"%PDF-1.4 fake".to_vec(),
                content_type: Some("application/pdf".into()),
            }),
            notify_one: Ok("Email sent successfully".into()),
            notify_all: Ok(NotifyAllResponse {
                message: "Bulk email complete".into(),
                details: Vec::new(),
                total: None,
                success: None,
                failed: None,
            }),
            gate: None,
            gated_operation: None,
            entered: Arc::new(Notify::new()),
        }
    }

    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn gated_on(self, operation: Operation) -> (Self, Arc<Notify>) {
        let (mut service, gate) = self.gated();
        service.gated_operation = Some(operation);
        (service, gate)
    }

    pub fn calls(&self) -> Vec<(Operation, Option<usize>)> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls").len()
    }

    async fn enter(&self, operation: Operation, index: Option<usize>) {
        self.calls.lock().expect("calls").push((operation, index));
        self.entered.notify_one();
        let held = self.gated_operation.map_or(true, |gated| gated == operation);
        if let (Some(gate), true) = (&self.gate, held) {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl OfferService for FakeService {
    async fn upload(&self, _file: &UploadFile) -> Result<UploadOutcome, ActionError> {
        self.enter(Operation::Upload, None).await;
        self.upload.clone()
    }

    async fn generate_one(
        &self,
        _token: &SessionToken,
        index: usize,
    ) -> Result<Artifact, ActionError> {
        self.enter(Operation::GenerateOne, Some(index)).await;
        self.artifact.clone()
    }

    async fn generate_all(&self, _token: &SessionToken) -> Result<Artifact, ActionError> {
        self.enter(Operation::GenerateAll, None).await;
        self.artifact.clone()
    }

    async fn notify_one(&self, _token: &SessionToken, index: usize) -> Result<String, ActionError> {
        self.enter(Operation::NotifyOne, Some(index)).await;
        self.notify_one.clone()
    }

    async fn notify_all(&self, _token: &SessionToken) -> Result<NotifyAllResponse, ActionError> {
        self.enter(Operation::NotifyAll, None).await;
        self.notify_all.clone()
    }
}

#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("saved").clone()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.saved
            .lock()
            .expect("saved")
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/downloads").join(filename))
    }
}
