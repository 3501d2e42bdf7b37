use super::common::{
    concepts, identifiers, objects, reference, reference_field, references, string, Object,
};
use super::FromResource;
use nphies_models::{CommunicationPayload, CommunicationRequestRecord};

impl FromResource for CommunicationRequestRecord {
    const RESOURCE_TYPE: &'static str = "CommunicationRequest";

    fn from_object(resource: &Object) -> Self {
        CommunicationRequestRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            category: concepts(resource, "category"),
            priority: string(resource, "priority"),
            subject: reference_field(resource, "subject"),
            about: references(resource, "about"),
            payload: objects(resource, "payload")
                .map(|p| CommunicationPayload {
                    content_string: string(p, "contentString"),
                    content_attachment: p.get("contentAttachment").cloned(),
                    content_reference: p.get("contentReference").and_then(reference),
                })
                .collect(),
            authored_on: string(resource, "authoredOn"),
            recipients: references(resource, "recipient"),
            sender: reference_field(resource, "sender"),
        }
    }
}
