//! CommunicationRequest projection

use super::datatypes::{Coding, Identifier, Reference};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_attachment: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_reference: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationRequestRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub category: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default)]
    pub about: Vec<Reference>,

    #[serde(default)]
    pub payload: Vec<CommunicationPayload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,

    #[serde(default)]
    pub recipients: Vec<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Reference>,
}

impl CommunicationRequestRecord {
    /// All `contentString` payloads joined by a single space.
    pub fn content_text(&self) -> String {
        self.payload
            .iter()
            .filter_map(|p| p.content_string.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
