//! Network operations against the offer-letter service. Each call is a single
//! request/response exchange; nothing is retried or queued.

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{Record, SessionToken},
    protocol::NotifyAllResponse,
};
use tracing::{info, warn};

use crate::{
    error::ActionError,
    inflight::{ActionKey, InFlightRegistry, Operation},
};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Date printed on the generated letters, sent as the `date` field.
    pub offer_date: Option<String>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            offer_date: None,
        }
    }

    pub fn with_offer_date(mut self, offer_date: impl Into<String>) -> Self {
        self.offer_date = Some(offer_date.into());
        self
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        if self.filename.trim().is_empty() {
            return Err(ActionError::InvalidUpload("No file selected".into()));
        }
        let extension = Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        if !extension.is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str())) {
            return Err(ActionError::InvalidUpload(format!(
                "Invalid file type. Allowed types: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ActionError::InvalidUpload(format!(
                "File is too large ({} bytes, limit {MAX_UPLOAD_BYTES})",
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub records: Vec<Record>,
    pub token: SessionToken,
    pub message: String,
}

/// The remote service. `HttpOfferService` is the production implementation.
#[async_trait]
pub trait OfferService: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<UploadOutcome, ActionError>;
    async fn generate_one(
        &self,
        token: &SessionToken,
        index: usize,
    ) -> Result<Artifact, ActionError>;
    async fn generate_all(&self, token: &SessionToken) -> Result<Artifact, ActionError>;
    async fn notify_one(&self, token: &SessionToken, index: usize) -> Result<String, ActionError>;
    async fn notify_all(&self, token: &SessionToken) -> Result<NotifyAllResponse, ActionError>;
}

/// Wraps an `OfferService` with upload pre-validation, the in-flight guard
/// and outcome logging. Token-requiring calls take `&SessionToken`, so a
/// missing session is handled by the caller before anything is sent.
pub struct ActionDispatcher {
    service: Arc<dyn OfferService>,
    inflight: InFlightRegistry,
}

impl ActionDispatcher {
    pub fn new(service: Arc<dyn OfferService>) -> Self {
        Self {
            service,
            inflight: InFlightRegistry::new(),
        }
    }

    pub fn inflight(&self) -> &InFlightRegistry {
        &self.inflight
    }

    pub async fn upload(&self, file: &UploadFile) -> Result<UploadOutcome, ActionError> {
        file.validate()?;
        let key = ActionKey::all(Operation::Upload);
        let _guard = self.inflight.try_acquire(key)?;
        let result = self.service.upload(file).await;
        log_outcome(key, &result);
        result
    }

    pub async fn generate_one(
        &self,
        token: &SessionToken,
        index: usize,
    ) -> Result<Artifact, ActionError> {
        let key = ActionKey::one(Operation::GenerateOne, index);
        let _guard = self.inflight.try_acquire(key)?;
        let result = self.service.generate_one(token, index).await;
        log_outcome(key, &result);
        result
    }

    pub async fn generate_all(&self, token: &SessionToken) -> Result<Artifact, ActionError> {
        let key = ActionKey::all(Operation::GenerateAll);
        let _guard = self.inflight.try_acquire(key)?;
        let result = self.service.generate_all(token).await;
        log_outcome(key, &result);
        result
    }

    pub async fn notify_one(
        &self,
        token: &SessionToken,
        index: usize,
    ) -> Result<String, ActionError> {
        let key = ActionKey::one(Operation::NotifyOne, index);
        let _guard = self.inflight.try_acquire(key)?;
        let result = self.service.notify_one(token, index).await;
        log_outcome(key, &result);
        result
    }

    pub async fn notify_all(&self, token: &SessionToken) -> Result<NotifyAllResponse, ActionError> {
        let key = ActionKey::all(Operation::NotifyAll);
        let _guard = self.inflight.try_acquire(key)?;
        let result = self.service.notify_all(token).await;
        log_outcome(key, &result);
        result
    }
}

fn log_outcome<T>(key: ActionKey, result: &Result<T, ActionError>) {
    match result {
        Ok(_) => info!(action = %key, "request completed"),
        Err(error) => warn!(action = %key, %error, "request failed"),
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
