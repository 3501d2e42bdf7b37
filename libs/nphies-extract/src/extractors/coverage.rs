use super::common::{
    concept_field, identifiers, objects, period_field, reference_field, references, string, Object,
};
use super::FromResource;
use nphies_models::{CoverageClass, CoverageRecord};

impl FromResource for CoverageRecord {
    const RESOURCE_TYPE: &'static str = "Coverage";

    fn from_object(resource: &Object) -> Self {
        CoverageRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            coverage_type: concept_field(resource, "type"),
            policy_holder: reference_field(resource, "policyHolder"),
            subscriber: reference_field(resource, "subscriber"),
            subscriber_id: string(resource, "subscriberId"),
            beneficiary: reference_field(resource, "beneficiary"),
            relationship: concept_field(resource, "relationship"),
            period: period_field(resource, "period"),
            payors: references(resource, "payor"),
            classes: objects(resource, "class")
                .map(|c| CoverageClass {
                    class_type: concept_field(c, "type"),
                    value: string(c, "value"),
                    name: string(c, "name"),
                })
                .collect(),
            network: string(resource, "network"),
        }
    }
}
