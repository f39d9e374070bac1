use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProtocolError;

/// Opaque correlator issued by the service on upload (`data_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ProtocolError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ProtocolError::EmptySessionToken);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One person in an uploaded dataset. Identified only by its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub program: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub tuition_fee: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_year_total: Option<f64>,
    /// Legacy single-fee payloads only carry this field.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee: Option<f64>,
}

impl Record {
    /// Trimmed contact address, `None` when absent or blank.
    pub fn contact_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    pub fn tuition(&self) -> Option<f64> {
        self.tuition_fee.or(self.fee)
    }

    /// `offer_letter_<name>.pdf` with every whitespace run collapsed to `_`.
    pub fn artifact_filename(&self) -> String {
        let mut stem = String::with_capacity(self.name.len());
        let mut in_space = false;
        for ch in self.name.chars() {
            if ch.is_whitespace() {
                if !in_space {
                    stem.push('_');
                }
                in_space = true;
                continue;
            }
            in_space = false;
            stem.push(if matches!(ch, '/' | '\\') { '_' } else { ch });
        }
        format!("offer_letter_{stem}.pdf")
    }
}

pub const ARCHIVE_FILENAME: &str = "offer_letters.zip";

/// Per-record, UI-only delivery state. Reset whenever the dataset is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationStatus {
    #[default]
    Unsent,
    Sending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn can_notify(self) -> bool {
        matches!(self, Self::Unsent | Self::Failed)
    }
}

/// Outcome tag carried by each row of a bulk notify response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) if value.is_finite() => Some(value),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) if value.fract() == 0.0 => Some(format!("{value:.0}")),
        Some(NumberOrText::Number(value)) => Some(value.to_string()),
        Some(NumberOrText::Text(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
