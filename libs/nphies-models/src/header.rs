//! MessageHeader projection

use super::datatypes::{Coding, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDestination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Present on response messages: the request being answered and its outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeaderRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `eventCoding` (or a coding-shaped `event`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_uri: Option<String>,

    #[serde(default)]
    pub destinations: Vec<MessageDestination>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<MessageSource>,

    #[serde(default)]
    pub focus: Vec<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<MessageResponse>,
}

impl MessageHeaderRecord {
    /// The event code, taken from the coding or else the last segment of `eventUri`.
    pub fn event_code(&self) -> Option<&str> {
        self.event
            .as_ref()
            .and_then(Coding::code)
            .filter(|c| !c.is_empty())
            .or_else(|| {
                self.event_uri
                    .as_deref()
                    .and_then(|uri| uri.rsplit('/').next())
                    .filter(|c| !c.is_empty())
            })
    }
}
