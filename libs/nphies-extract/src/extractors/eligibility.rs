use super::common::{
    boolean, concept_field, extensions, identifiers, objects, period_field, reference_field,
    string, strings, Object,
};
use super::FromResource;
use nphies_models::{EligibilityInsurance, EligibilityRequestRecord};

impl FromResource for EligibilityRequestRecord {
    const RESOURCE_TYPE: &'static str = "CoverageEligibilityRequest";

    fn from_object(resource: &Object) -> Self {
        let newborn = extensions(resource)
            .filter(|(url, _)| url.contains("newborn"))
            .find_map(|(_, ext)| boolean(ext, "valueBoolean"));

        EligibilityRequestRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            priority: concept_field(resource, "priority"),
            purpose: strings(resource, "purpose"),
            patient: reference_field(resource, "patient"),
            serviced_date: string(resource, "servicedDate"),
            serviced_period: period_field(resource, "servicedPeriod"),
            created: string(resource, "created"),
            provider: reference_field(resource, "provider"),
            insurer: reference_field(resource, "insurer"),
            facility: reference_field(resource, "facility"),
            insurance: objects(resource, "insurance")
                .map(|i| EligibilityInsurance {
                    focal: boolean(i, "focal"),
                    coverage: reference_field(i, "coverage"),
                })
                .collect(),
            newborn,
        }
    }
}
