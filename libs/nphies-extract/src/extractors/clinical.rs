use super::common::{
    boolean, coding, concept, concept_field, concepts, human_names, identifiers, objects, period_field,
    reference_field, string, Object,
};
use super::FromResource;
use nphies_models::{EncounterRecord, LocationRecord, MedicationRequestRecord, PractitionerRecord};
use serde_json::Value;

impl FromResource for PractitionerRecord {
    const RESOURCE_TYPE: &'static str = "Practitioner";

    fn from_object(resource: &Object) -> Self {
        PractitionerRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            active: boolean(resource, "active"),
            names: human_names(resource),
            gender: string(resource, "gender"),
            qualifications: objects(resource, "qualification")
                .filter_map(|q| q.get("code").and_then(concept))
                .collect(),
            resource: Value::Object(resource.clone()),
        }
    }
}

impl FromResource for EncounterRecord {
    const RESOURCE_TYPE: &'static str = "Encounter";

    fn from_object(resource: &Object) -> Self {
        // R4 `class` is a bare Coding
        let encounter_class = resource
            .get("class")
            .and_then(|c| coding(c).or_else(|| concept(c)));

        EncounterRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            encounter_class,
            service_type: concept_field(resource, "serviceType"),
            subject: reference_field(resource, "subject"),
            period: period_field(resource, "period"),
            service_provider: reference_field(resource, "serviceProvider"),
            resource: Value::Object(resource.clone()),
        }
    }
}

impl FromResource for LocationRecord {
    const RESOURCE_TYPE: &'static str = "Location";

    fn from_object(resource: &Object) -> Self {
        LocationRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            name: string(resource, "name"),
            types: concepts(resource, "type"),
            managing_organization: reference_field(resource, "managingOrganization"),
            resource: Value::Object(resource.clone()),
        }
    }
}

impl FromResource for MedicationRequestRecord {
    const RESOURCE_TYPE: &'static str = "MedicationRequest";

    fn from_object(resource: &Object) -> Self {
        let medication = concept_field(resource, "medicationCodeableConcept").or_else(|| {
            reference_field(resource, "medicationReference").map(|r| nphies_models::Coding {
                display: r.reference.or(r.display),
                ..Default::default()
            })
        });

        MedicationRequestRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            intent: string(resource, "intent"),
            medication,
            subject: reference_field(resource, "subject"),
            authored_on: string(resource, "authoredOn"),
            requester: reference_field(resource, "requester"),
            resource: Value::Object(resource.clone()),
        }
    }
}
