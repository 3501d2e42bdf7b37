use super::common::{
    array, boolean, choice, concept, concept_field, decimal, extensions, identifiers, money_field,
    object, objects, positive_int, reference, reference_field, string, Object,
};
use super::FromResource;
use nphies_models::{
    CareTeamMember, ClaimExtensions, ClaimInsurance, ClaimItem, ClaimRecord, Diagnosis,
    SupportingInfo,
};
use serde_json::Value;

impl FromResource for ClaimRecord {
    const RESOURCE_TYPE: &'static str = "Claim";

    fn from_object(resource: &Object) -> Self {
        ClaimRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            status: string(resource, "status"),
            claim_type: concept_field(resource, "type"),
            sub_type: concept_field(resource, "subType"),
            claim_use: string(resource, "use"),
            patient: reference_field(resource, "patient"),
            created: string(resource, "created"),
            insurer: reference_field(resource, "insurer"),
            provider: reference_field(resource, "provider"),
            priority: concept_field(resource, "priority"),
            care_team: objects(resource, "careTeam").map(care_team_member).collect(),
            supporting_info: objects(resource, "supportingInfo")
                .map(supporting_info)
                .collect(),
            diagnosis: objects(resource, "diagnosis").map(diagnosis).collect(),
            insurance: objects(resource, "insurance").map(insurance).collect(),
            items: objects(resource, "item").map(item).collect(),
            total: money_field(resource, "total"),
            extensions: claim_extensions(resource),
        }
    }
}

fn claim_extensions(resource: &Object) -> ClaimExtensions {
    let mut out = ClaimExtensions::default();
    for (url, ext) in extensions(resource) {
        if url.contains("eligibility-offline-date") {
            out.eligibility_offline_date =
                string(ext, "valueDateTime").or_else(|| string(ext, "valueDate"));
        } else if url.contains("eligibility-offline") {
            out.eligibility_offline_reference = string(ext, "valueString");
        } else if url.contains("newborn") {
            out.newborn = boolean(ext, "valueBoolean");
        } else if url.contains("encounter") {
            out.encounter = reference_field(ext, "valueReference");
        } else if url.contains("episode") {
            out.episode = object(ext, "valueIdentifier").and_then(|i| string(i, "value"));
        } else if url.contains("accountingPeriod") {
            out.accounting_period = string(ext, "valueDate");
        }
    }
    out
}

fn care_team_member(obj: &Object) -> CareTeamMember {
    CareTeamMember {
        sequence: positive_int(obj, "sequence"),
        provider: reference_field(obj, "provider"),
        role: concept_field(obj, "role"),
        qualification: concept_field(obj, "qualification"),
    }
}

fn supporting_info(obj: &Object) -> SupportingInfo {
    SupportingInfo {
        sequence: positive_int(obj, "sequence"),
        category: concept_field(obj, "category"),
        code: concept_field(obj, "code"),
        timing: date_or_period_start(obj, "timing"),
        value: choice(obj, "value").map(|(_, v)| v.clone()),
    }
}

fn diagnosis(obj: &Object) -> Diagnosis {
    // NPHIES always codes diagnoses; a diagnosisReference is kept as a display-only coding
    let code = obj
        .get("diagnosisCodeableConcept")
        .and_then(concept)
        .or_else(|| {
            obj.get("diagnosisReference")
                .and_then(reference)
                .and_then(|r| r.reference)
                .map(|r| nphies_models::Coding {
                    display: Some(r),
                    ..Default::default()
                })
        });

    Diagnosis {
        sequence: positive_int(obj, "sequence"),
        code,
        diagnosis_type: array(obj, "type").find_map(concept),
        on_admission: concept_field(obj, "onAdmission"),
    }
}

fn insurance(obj: &Object) -> ClaimInsurance {
    ClaimInsurance {
        sequence: positive_int(obj, "sequence"),
        focal: boolean(obj, "focal").unwrap_or(false),
        coverage: reference_field(obj, "coverage"),
    }
}

fn item(obj: &Object) -> ClaimItem {
    ClaimItem {
        sequence: positive_int(obj, "sequence"),
        product_or_service: concept_field(obj, "productOrService"),
        quantity: object(obj, "quantity")
            .and_then(|q| q.get("value"))
            .and_then(decimal),
        unit_price: money_field(obj, "unitPrice"),
        net: money_field(obj, "net"),
        serviced_date: date_or_period_start(obj, "serviced"),
        diagnosis_sequence: sequences(obj, "diagnosisSequence"),
        care_team_sequence: sequences(obj, "careTeamSequence"),
    }
}

/// `<prefix>Date` / `<prefix>DateTime`, or the start of `<prefix>Period`.
fn date_or_period_start(obj: &Object, prefix: &str) -> Option<String> {
    choice(obj, prefix).and_then(|(kind, value)| match kind {
        "Period" => value.get("start").and_then(Value::as_str).map(str::to_string),
        _ => value.as_str().map(str::to_string),
    })
}

fn sequences(obj: &Object, key: &str) -> Vec<u32> {
    array(obj, key)
        .filter_map(Value::as_u64)
        .filter_map(|n| u32::try_from(n).ok())
        .collect()
}
