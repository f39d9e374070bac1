use serde::{Deserialize, Serialize};

use crate::{
    domain::{DeliveryStatus, Record, SessionToken},
    error::{ProtocolError, ServiceErrorBody},
};

pub const FIELD_FILE: &str = "file";
pub const FIELD_DATE: &str = "date";
pub const FIELD_INDEX: &str = "index";
pub const FIELD_DATA_ID: &str = "data_id";

/// A JSON reply that is either `{error}` or the operation's success payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceReply<T> {
    Failure(ServiceErrorBody),
    Success(T),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub message: String,
    pub data_id: String,
    #[serde(default)]
    pub preview: Vec<Record>,
}

impl UploadResponse {
    pub fn into_parts(self) -> Result<(Vec<Record>, SessionToken, String), ProtocolError> {
        let token = SessionToken::parse(self.data_id)?;
        Ok((self.preview, token, self.message))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyDetail {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyAllResponse {
    pub message: String,
    #[serde(default)]
    pub details: Vec<NotifyDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
