//! Acknowledgement builder
//!
//! Eligibility, prior-authorization, claim and communication requests are
//! answered with a message bundle whose MessageHeader carries the response
//! event and an outcome code. Every other message type gets the generic
//! empty acknowledgement.

use crate::dispatch::OverallStatus;
use nphies_models::{
    Bundle, BundleEntry, BundleType, ExtractedData, MessageType, MESSAGE_EVENTS_SYSTEM,
};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

/// `MessageHeader.response.code` for an overall dispatch status
pub fn response_code(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Success => "ok",
        OverallStatus::PartialSuccess => "transient-error",
        OverallStatus::Failed => "fatal-error",
    }
}

/// Message types with a dedicated acknowledgement template, paired with the
/// event they are answered with.
fn templated_response_event(message_type: MessageType) -> Option<MessageType> {
    match message_type {
        MessageType::EligibilityRequest
        | MessageType::PriorauthRequest
        | MessageType::ClaimRequest
        | MessageType::CommunicationRequest => message_type.response_event(),
        _ => None,
    }
}

pub fn build_acknowledgement(
    message_type: MessageType,
    status: OverallStatus,
    data: &ExtractedData,
) -> Bundle {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let Some(event) = templated_response_event(message_type) else {
        let mut bundle = Bundle::new(BundleType::Message);
        bundle.id = Some(format!("response-{}", Uuid::new_v4()));
        bundle.timestamp = Some(timestamp);
        return bundle;
    };

    let mut bundle = Bundle::nphies_message(format!("{event}-{}", Uuid::new_v4()), timestamp);
    bundle.add_entry(BundleEntry::new(
        format!("urn:uuid:{}", Uuid::new_v4()),
        message_header(event, status, data),
    ));
    bundle
}

fn message_header(event: MessageType, status: OverallStatus, data: &ExtractedData) -> JsonValue {
    let mut response = json!({ "code": response_code(status) });
    if let Some(id) = data.message_header.as_ref().and_then(|h| h.id.as_deref()) {
        response["identifier"] = json!(id);
    }

    let mut header = json!({
        "resourceType": "MessageHeader",
        "id": Uuid::new_v4().to_string(),
        "eventCoding": {
            "system": MESSAGE_EVENTS_SYSTEM,
            "code": event.as_str(),
        },
        "response": response,
    });

    let focus = data.focus();
    if !focus.is_empty() {
        header["focus"] = json!(focus);
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use nphies_models::{MessageHeaderRecord, Reference};

    fn inbound(message_type: MessageType) -> ExtractedData {
        let mut data = ExtractedData::new(message_type);
        data.message_header = Some(MessageHeaderRecord {
            id: Some("hdr-1".to_string()),
            focus: vec![Reference::new("Claim/claim-1")],
            ..Default::default()
        });
        data
    }

    #[test]
    fn test_claim_acknowledgement() {
        let bundle = build_acknowledgement(
            MessageType::ClaimRequest,
            OverallStatus::PartialSuccess,
            &inbound(MessageType::ClaimRequest),
        );
        let value = bundle.to_value().unwrap();

        assert_eq!(value["resourceType"], "Bundle");
        assert_eq!(value["type"], "message");
        assert!(value["id"].as_str().unwrap().starts_with("claim-response-"));
        assert_eq!(
            value["meta"]["profile"][0],
            nphies_models::NPHIES_BUNDLE_PROFILE
        );

        let header = &value["entry"][0]["resource"];
        assert!(value["entry"][0]["fullUrl"]
            .as_str()
            .unwrap()
            .starts_with("urn:uuid:"));
        assert_eq!(header["eventCoding"]["code"], "claim-response");
        assert_eq!(header["response"]["code"], "transient-error");
        assert_eq!(header["response"]["identifier"], "hdr-1");
        assert_eq!(header["focus"][0]["reference"], "Claim/claim-1");
    }

    #[test]
    fn test_outcome_codes() {
        for (status, code) in [
            (OverallStatus::Success, "ok"),
            (OverallStatus::PartialSuccess, "transient-error"),
            (OverallStatus::Failed, "fatal-error"),
        ] {
            let bundle = build_acknowledgement(
                MessageType::EligibilityRequest,
                status,
                &ExtractedData::new(MessageType::EligibilityRequest),
            );
            let value = bundle.to_value().unwrap();
            let header = &value["entry"][0]["resource"];
            assert_eq!(header["eventCoding"]["code"], "eligibility-response");
            assert_eq!(header["response"]["code"], code);
            assert!(header.get("focus").is_none());
        }
    }

    #[test]
    fn test_generic_acknowledgement() {
        for message_type in [
            MessageType::PaymentNotice,
            MessageType::PrescriberRequest,
            MessageType::ClaimResponse,
        ] {
            let bundle = build_acknowledgement(
                message_type,
                OverallStatus::Success,
                &inbound(message_type),
            );
            let value = bundle.to_value().unwrap();
            assert!(value["id"].as_str().unwrap().starts_with("response-"));
            assert_eq!(value["type"], "message");
            assert!(value.get("meta").is_none());
            assert_eq!(value["entry"], json!([]));
        }
    }
}
