//! NPHIES message events
//!
//! Every inbound bundle is classified into exactly one of these. The wire form
//! is the kebab-case event code from the `ksa-message-events` code system.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code system for NPHIES message events
pub const MESSAGE_EVENTS_SYSTEM: &str =
    "http://nphies.sa/terminology/CodeSystem/ksa-message-events";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    EligibilityRequest,
    EligibilityResponse,
    PriorauthRequest,
    PriorauthResponse,
    #[default]
    ClaimRequest,
    ClaimResponse,
    CommunicationRequest,
    CommunicationResponse,
    PrescriberRequest,
    PrescriberResponse,
    PaymentNotice,
    PaymentReconciliation,
}

impl MessageType {
    pub const ALL: [MessageType; 12] = [
        MessageType::EligibilityRequest,
        MessageType::EligibilityResponse,
        MessageType::PriorauthRequest,
        MessageType::PriorauthResponse,
        MessageType::ClaimRequest,
        MessageType::ClaimResponse,
        MessageType::CommunicationRequest,
        MessageType::CommunicationResponse,
        MessageType::PrescriberRequest,
        MessageType::PrescriberResponse,
        MessageType::PaymentNotice,
        MessageType::PaymentReconciliation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::EligibilityRequest => "eligibility-request",
            MessageType::EligibilityResponse => "eligibility-response",
            MessageType::PriorauthRequest => "priorauth-request",
            MessageType::PriorauthResponse => "priorauth-response",
            MessageType::ClaimRequest => "claim-request",
            MessageType::ClaimResponse => "claim-response",
            MessageType::CommunicationRequest => "communication-request",
            MessageType::CommunicationResponse => "communication-response",
            MessageType::PrescriberRequest => "prescriber-request",
            MessageType::PrescriberResponse => "prescriber-response",
            MessageType::PaymentNotice => "payment-notice",
            MessageType::PaymentReconciliation => "payment-reconciliation",
        }
    }

    /// Map an event code to a message type. Returns `None` for codes outside the table.
    pub fn from_event_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == code)
    }

    /// The event a receiver answers this message with, if it is a request.
    pub fn response_event(&self) -> Option<MessageType> {
        match self {
            MessageType::EligibilityRequest => Some(MessageType::EligibilityResponse),
            MessageType::PriorauthRequest => Some(MessageType::PriorauthResponse),
            MessageType::ClaimRequest => Some(MessageType::ClaimResponse),
            MessageType::CommunicationRequest => Some(MessageType::CommunicationResponse),
            MessageType::PrescriberRequest => Some(MessageType::PrescriberResponse),
            _ => None,
        }
    }

    pub fn is_request(&self) -> bool {
        self.response_event().is_some()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_event_code(s).ok_or_else(|| Error::UnknownMessageType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for message_type in MessageType::ALL {
            let parsed: MessageType = message_type.as_str().parse().unwrap();
            assert_eq!(parsed, message_type);
        }
    }

    #[test]
    fn test_serde_uses_event_code() {
        let json = serde_json::to_value(MessageType::PriorauthRequest).unwrap();
        assert_eq!(json, "priorauth-request");

        let parsed: MessageType = serde_json::from_str("\"payment-reconciliation\"").unwrap();
        assert_eq!(parsed, MessageType::PaymentReconciliation);
    }

    #[test]
    fn test_unknown_code() {
        assert!(MessageType::from_event_code("claim-request-v2").is_none());
        let err = "foo".parse::<MessageType>().unwrap_err();
        assert!(matches!(err, Error::UnknownMessageType(code) if code == "foo"));
    }

    #[test]
    fn test_response_events() {
        assert_eq!(
            MessageType::ClaimRequest.response_event(),
            Some(MessageType::ClaimResponse)
        );
        assert!(MessageType::PaymentNotice.response_event().is_none());
        assert!(!MessageType::ClaimResponse.is_request());
    }

    #[test]
    fn test_default_is_claim_request() {
        assert_eq!(MessageType::default(), MessageType::ClaimRequest);
    }
}
