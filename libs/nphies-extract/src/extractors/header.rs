use super::common::{coding, object, objects, reference, reference_field, references, string, Object};
use super::FromResource;
use nphies_models::{MessageDestination, MessageHeaderRecord, MessageResponse, MessageSource};
use serde_json::Value;

impl FromResource for MessageHeaderRecord {
    const RESOURCE_TYPE: &'static str = "MessageHeader";

    fn from_object(resource: &Object) -> Self {
        // Older senders put the coding in `event`, or a URI there instead of `eventUri`
        let event = resource
            .get("eventCoding")
            .and_then(coding)
            .or_else(|| resource.get("event").and_then(coding));
        let event_uri = string(resource, "eventUri").or_else(|| {
            resource
                .get("event")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        MessageHeaderRecord {
            id: string(resource, "id"),
            event,
            event_uri,
            destinations: objects(resource, "destination")
                .map(|d| MessageDestination {
                    endpoint: string(d, "endpoint"),
                    name: string(d, "name"),
                    receiver: d.get("receiver").and_then(reference),
                })
                .collect(),
            sender: reference_field(resource, "sender"),
            source: object(resource, "source").map(|s| MessageSource {
                endpoint: string(s, "endpoint"),
                name: string(s, "name"),
                software: string(s, "software"),
                version: string(s, "version"),
            }),
            focus: references(resource, "focus"),
            response: object(resource, "response").map(|r| MessageResponse {
                identifier: string(r, "identifier"),
                code: string(r, "code"),
            }),
        }
    }
}
