//! `OfferService` over HTTP. Every request is multipart with named fields;
//! replies are classified here into `Artifact`, a typed payload, or an
//! `ActionError`, so nothing downstream inspects status codes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::SessionToken,
    error::ServiceErrorBody,
    protocol::{
        NotifyAllResponse, NotifyResponse, ServiceReply, UploadResponse, FIELD_DATA_ID, FIELD_DATE,
        FIELD_FILE, FIELD_INDEX,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    dispatcher::{Artifact, OfferService, UploadFile, UploadOutcome},
    error::ActionError,
    inflight::Operation,
};

/// Paths relative to the service base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: String,
    pub generate_one: String,
    pub generate_all: String,
    pub notify_one: String,
    pub notify_all: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload: "upload".into(),
            generate_one: "generate-pdf".into(),
            generate_all: "generate-all-pdfs".into(),
            notify_one: "send-email".into(),
            notify_all: "send-all-emails".into(),
        }
    }
}

impl Endpoints {
    fn path(&self, operation: Operation) -> &str {
        match operation {
            Operation::Upload => &self.upload,
            Operation::GenerateOne => &self.generate_one,
            Operation::GenerateAll => &self.generate_all,
            Operation::NotifyOne => &self.notify_one,
            Operation::NotifyAll => &self.notify_all,
        }
    }
}

pub struct HttpOfferService {
    http: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpOfferService {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::with_client(
            Client::new(),
            Url::parse(server_url)?,
            Endpoints::default(),
        ))
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ActionError> {
        let base_url = Url::parse(server_url).map_err(|err| ActionError::Transport {
            message: format!("invalid server url '{server_url}': {err}"),
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ActionError::Transport {
                message: format!("failed to build http client: {err}"),
            })?;
        Ok(Self::with_client(http, base_url, Endpoints::default()))
    }

    pub fn with_client(http: Client, mut base_url: Url, endpoints: Endpoints) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            endpoints,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, operation: Operation) -> Result<Url, ActionError> {
        let path = self.endpoints.path(operation).trim_start_matches('/');
        self.base_url
            .join(path)
            .map_err(|err| ActionError::Transport {
                message: format!("invalid endpoint '{path}': {err}"),
            })
    }

    async fn post(&self, operation: Operation, form: Form) -> Result<RawReply, ActionError> {
        let url = self.endpoint(operation)?;
        debug!(operation = operation.as_str(), %url, "sending request");
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(operation, err))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(operation, err))?;

        Ok(RawReply {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

fn session_form(token: &SessionToken) -> Form {
    Form::new().text(FIELD_DATA_ID, token.as_str().to_string())
}

fn indexed_form(token: &SessionToken, index: usize) -> Form {
    session_form(token).text(FIELD_INDEX, index.to_string())
}

fn transport_error(operation: Operation, err: reqwest::Error) -> ActionError {
    warn!(operation = operation.as_str(), error = %err, "transport failure");
    ActionError::Transport {
        message: err.to_string(),
    }
}

/// Reply as received, before classification.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawReply {
    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.to_ascii_lowercase().contains("json"))
    }
}

/// Binary artifact on success, otherwise the `{error}` message or a fallback.
pub fn classify_artifact(operation: Operation, reply: RawReply) -> Result<Artifact, ActionError> {
    if reply.status.is_success() && !reply.is_json() && !reply.body.is_empty() {
        return Ok(Artifact {
            bytes: reply.body,
            content_type: reply.content_type,
        });
    }

    match serde_json::from_slice::<ServiceErrorBody>(&reply.body) {
        Ok(body) => Err(ActionError::Service {
            message: body.error,
        }),
        Err(err) => {
            warn!(
                operation = operation.as_str(),
                status = reply.status.as_u16(),
                error = %err,
                "unreadable artifact reply"
            );
            Err(ActionError::Transport {
                message: operation.fallback_error().to_string(),
            })
        }
    }
}

/// Structured JSON reply: the success payload, the `{error}` message, or a
/// fallback when the body cannot be read.
pub fn classify_json<T: DeserializeOwned>(
    operation: Operation,
    reply: RawReply,
) -> Result<T, ActionError> {
    match serde_json::from_slice::<ServiceReply<T>>(&reply.body) {
        Ok(ServiceReply::Failure(body)) => Err(ActionError::Service {
            message: body.error,
        }),
        Ok(ServiceReply::Success(payload)) if reply.status.is_success() => Ok(payload),
        Ok(ServiceReply::Success(_)) => Err(ActionError::Service {
            message: operation.fallback_error().to_string(),
        }),
        Err(err) => {
            warn!(
                operation = operation.as_str(),
                status = reply.status.as_u16(),
                error = %err,
                "unreadable json reply"
            );
            Err(ActionError::Transport {
                message: operation.fallback_error().to_string(),
            })
        }
    }
}

#[async_trait]
impl OfferService for HttpOfferService {
    async fn upload(&self, file: &UploadFile) -> Result<UploadOutcome, ActionError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
        let mut form = Form::new().part(FIELD_FILE, part);
        if let Some(date) = &file.offer_date {
            form = form.text(FIELD_DATE, date.clone());
        }

        let reply = self.post(Operation::Upload, form).await?;
        let upload: UploadResponse = classify_json(Operation::Upload, reply)?;
        let (records, token, message) =
            upload
                .into_parts()
                .map_err(|err| ActionError::Transport {
                    message: err.to_string(),
                })?;
        Ok(UploadOutcome {
            records,
            token,
            message,
        })
    }

    async fn generate_one(
        &self,
        token: &SessionToken,
        index: usize,
    ) -> Result<Artifact, ActionError> {
        let reply = self
            .post(Operation::GenerateOne, indexed_form(token, index))
            .await?;
        classify_artifact(Operation::GenerateOne, reply)
    }

    async fn generate_all(&self, token: &SessionToken) -> Result<Artifact, ActionError> {
        let reply = self
            .post(Operation::GenerateAll, session_form(token))
            .await?;
        classify_artifact(Operation::GenerateAll, reply)
    }

    async fn notify_one(&self, token: &SessionToken, index: usize) -> Result<String, ActionError> {
        let reply = self
            .post(Operation::NotifyOne, indexed_form(token, index))
            .await?;
        let body: NotifyResponse = classify_json(Operation::NotifyOne, reply)?;
        Ok(body.message)
    }

    async fn notify_all(&self, token: &SessionToken) -> Result<NotifyAllResponse, ActionError> {
        let reply = self
            .post(Operation::NotifyAll, session_form(token))
            .await?;
        classify_json(Operation::NotifyAll, reply)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
