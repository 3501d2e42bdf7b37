//! Bundle classification
//!
//! Assigns every bundle exactly one [`MessageType`]. The MessageHeader event
//! code wins when present; bundles without a header are classified from the
//! resource types they carry. Classification never fails.

use crate::extractors::FromResource;
use nphies_models::{MessageHeaderRecord, MessageType};
use serde::Serialize;
use serde_json::Value;

/// How a message type was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Mapped from a recognised MessageHeader event code
    EventCode,
    /// No MessageHeader; inferred from resource types present
    Inferred,
    /// Nothing usable; the default message type was used
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub message_type: MessageType,
    pub source: ClassificationSource,
    /// The raw event code, when a header carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,
}

impl Classification {
    fn new(message_type: MessageType, source: ClassificationSource) -> Self {
        Self {
            message_type,
            source,
            event_code: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source != ClassificationSource::EventCode
    }
}

/// Classify a raw bundle. Anything that is not a readable bundle classifies
/// as the default type.
pub fn classify(bundle: &Value) -> Classification {
    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    classify_entries(entries)
}

pub(crate) fn classify_entries(entries: &[Value]) -> Classification {
    let resources = || {
        entries
            .iter()
            .filter_map(|entry| entry.get("resource"))
            .filter(|resource| resource.is_object())
    };
    let has_type = |resource_type: &str| {
        resources().any(|r| r.get("resourceType").and_then(Value::as_str) == Some(resource_type))
    };

    let header = resources()
        .find(|r| r.get("resourceType").and_then(Value::as_str) == Some("MessageHeader"));

    if let Some(header) = header {
        // A header without a recognised code is not second-guessed from the payload
        let event_code = MessageHeaderRecord::extract(header)
            .ok()
            .and_then(|h| h.event_code().map(str::to_string));

        return match event_code.as_deref().and_then(MessageType::from_event_code) {
            Some(message_type) => Classification {
                message_type,
                source: ClassificationSource::EventCode,
                event_code,
            },
            None => {
                tracing::warn!(
                    event_code = event_code.as_deref().unwrap_or(""),
                    default = %MessageType::default(),
                    "Unrecognised MessageHeader event code, using default message type"
                );
                Classification {
                    event_code,
                    ..Classification::new(MessageType::default(), ClassificationSource::Default)
                }
            }
        };
    }

    let inferred = if has_type("CoverageEligibilityRequest") {
        Some(MessageType::EligibilityRequest)
    } else if has_type("Claim") {
        Some(MessageType::ClaimRequest)
    } else if has_type("CommunicationRequest") {
        Some(MessageType::CommunicationRequest)
    } else {
        None
    };

    match inferred {
        Some(message_type) => {
            tracing::info!(
                message_type = %message_type,
                "Bundle has no MessageHeader, message type inferred from resources"
            );
            Classification::new(message_type, ClassificationSource::Inferred)
        }
        None => {
            tracing::warn!(
                default = %MessageType::default(),
                "Bundle has no MessageHeader and no classifiable resources, using default message type"
            );
            Classification::new(MessageType::default(), ClassificationSource::Default)
        }
    }
}
