// SPDX-License-Identifier: BUSL-1.1
//! Response envelope of the decoding service.
//!
//! The wire shape is loose JSON with optional fields. It is parsed into
//! [`RemoteEnvelope`] (transport level, `data` kept opaque) and only turned
//! into a [`BusinessResult`] once `code` says the transport succeeded.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Transport-level success code.
pub const SUCCESS_CODE: &str = "10000";

/// Top-level reply: `{code, msg, data?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    pub code: String,
    /// Informational only; non-string values are kept as their JSON text.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Business outcome carried in `data` of a transport-successful envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBusinessData", into = "RawBusinessData")]
pub enum BusinessResult {
    /// The service understood the request and declined it.
    Declined {
        sub_code: String,
        sub_msg: Option<String>,
    },
    /// Encrypted identity payload (base64 of DES-CBC ciphertext).
    Info { info: String },
}

/// `sub_code` is `Some` whenever the key is present, even as `null`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawBusinessData {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    sub_code: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    sub_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    info: Option<String>,
}

impl TryFrom<RawBusinessData> for BusinessResult {
    type Error = String;

    fn try_from(raw: RawBusinessData) -> Result<Self, Self::Error> {
        // A present sub_code decides the outcome even if info is also set.
        match (raw.sub_code, raw.info) {
            (Some(sub_code), _) => Ok(Self::Declined {
                sub_code: value_text(sub_code),
                sub_msg: raw.sub_msg,
            }),
            (None, Some(info)) => Ok(Self::Info { info }),
            (None, None) => Err("data carries neither `sub_code` nor `info`".into()),
        }
    }
}

impl From<BusinessResult> for RawBusinessData {
    fn from(result: BusinessResult) -> Self {
        match result {
            BusinessResult::Declined { sub_code, sub_msg } => Self {
                sub_code: Some(Value::String(sub_code)),
                sub_msg,
                info: None,
            },
            BusinessResult::Info { info } => Self {
                info: Some(info),
                ..Self::default()
            },
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(value_text(other)),
    })
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Interpretation of an envelope across both levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeStatus {
    /// `code` is not the success code.
    Rejected { code: String, msg: Option<String> },
    /// Transport succeeded, business outcome declined.
    Declined {
        sub_code: String,
        sub_msg: Option<String>,
    },
    /// Transport succeeded and an encrypted payload is present.
    Accepted { info: String },
}

/// A transport-successful envelope whose `data` could not be interpreted.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("envelope with success code carries no `data`")]
    MissingData,
    #[error("malformed `data` in envelope: {0}")]
    MalformedData(String),
}

impl RemoteEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Fold both levels into one status. `data` is ignored unless the
    /// transport code is [`SUCCESS_CODE`].
    pub fn status(self) -> Result<EnvelopeStatus, EnvelopeError> {
        if !self.is_success() {
            return Ok(EnvelopeStatus::Rejected {
                code: self.code,
                msg: self.msg,
            });
        }

        let data = self.data.ok_or(EnvelopeError::MissingData)?;
        let result: BusinessResult = serde_json::from_value(data)
            .map_err(|e| EnvelopeError::MalformedData(e.to_string()))?;

        Ok(match result {
            BusinessResult::Declined { sub_code, sub_msg } => {
                EnvelopeStatus::Declined { sub_code, sub_msg }
            }
            BusinessResult::Info { info } => EnvelopeStatus::Accepted { info },
        })
    }
}
