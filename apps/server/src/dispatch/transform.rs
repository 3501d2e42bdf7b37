//! Handler payload transforms
//!
//! Each handler reads one slice of the extracted bundle and receives one work
//! item per record in that slice. Transforms are pure: they only read the
//! shared `ExtractedData` and never fail. An empty slice yields no work items
//! and the dispatcher reports the handler as skipped.

use crate::routing::{tasks, HandlerName};
use nphies_models::{
    Address, ClaimRecord, CommunicationRequestRecord, Decimal, Diagnosis, EligibilityInsurance,
    EligibilityRequestRecord, ExtractedData, Identifier, PatientRecord, Period, Reference,
    SupportingInfo,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One payload destined for a handler, numbered before any call is made
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    /// 1-based position within the handler's work list
    pub sequence: usize,

    pub task: String,

    /// Id of the record the payload was built from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub payload: JsonValue,
}

/// Build the ordered work list for `handler` running `task`.
pub fn transform(handler: HandlerName, task: &str, data: &ExtractedData) -> Vec<WorkItem> {
    let drafts: Vec<(String, Option<String>, JsonValue)> = match handler {
        HandlerName::Claimlinc => data
            .claims
            .iter()
            .map(|claim| {
                draft(claimlinc_task(task, claim), claim.id.clone(), &ClaimPayload::from(claim))
            })
            .collect(),

        HandlerName::Recordlinc => data
            .patients
            .iter()
            .map(|patient| draft(task, patient.id.clone(), &PatientPayload::from(patient)))
            .collect(),

        HandlerName::Authlinc => {
            // Eligibility requests go out on every authlinc route; `preauth`
            // only names the verb for the preauthorization claims
            let eligibility_task = if task == tasks::PREAUTH {
                tasks::VALIDATE
            } else {
                task
            };
            let mut drafts: Vec<_> = data
                .eligibility_requests
                .iter()
                .map(|request| {
                    draft(eligibility_task, request.id.clone(), &EligibilityPayload::from(request))
                })
                .collect();
            drafts.extend(
                data.claims
                    .iter()
                    .filter(|claim| claim.is_preauthorization())
                    .map(|claim| {
                        draft(tasks::PREAUTH, claim.id.clone(), &PreauthPayload::from(claim))
                    }),
            );
            drafts
        }

        HandlerName::Notifylinc => data
            .communications
            .iter()
            .map(|comm| draft(task, comm.id.clone(), &NotificationPayload::from(comm)))
            .collect(),

        HandlerName::Doculinc => data
            .claims
            .iter()
            .filter(|claim| !claim.supporting_info.is_empty())
            .map(|claim| draft(task, claim.id.clone(), &DocumentationPayload::from(claim)))
            .collect(),

        HandlerName::Matchlinc => data
            .claims
            .iter()
            .map(|claim| draft(task, claim.id.clone(), &MatchPayload::from(claim)))
            .collect(),

        HandlerName::Reviewerlinc => data
            .claims
            .iter()
            .map(|claim| draft(task, claim.id.clone(), &ReviewPayload::from(claim)))
            .collect(),

        HandlerName::Claimtrackerlinc => data
            .claims
            .iter()
            .map(|claim| draft(task, claim.id.clone(), &TrackerPayload::from(claim)))
            .collect(),
    };

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, (task, subject, payload))| WorkItem {
            sequence: index + 1,
            task,
            subject,
            payload,
        })
        .collect()
}

/// `submit` and `check` are chosen per claim from `Claim.use`; any other
/// configured verb is sent unchanged.
fn claimlinc_task<'a>(task: &'a str, claim: &ClaimRecord) -> &'a str {
    match task {
        tasks::SUBMIT | tasks::CHECK if claim.is_claim() => tasks::SUBMIT,
        tasks::SUBMIT | tasks::CHECK => tasks::CHECK,
        other => other,
    }
}

/// Reason reported when `handler` has nothing to process.
pub fn skip_reason(handler: HandlerName) -> &'static str {
    match handler {
        HandlerName::Recordlinc => "No patients found",
        HandlerName::Authlinc => "No eligibility requests or preauthorization claims found",
        HandlerName::Notifylinc => "No communication requests found",
        HandlerName::Doculinc => "No claims with supporting information found",
        HandlerName::Claimlinc
        | HandlerName::Matchlinc
        | HandlerName::Reviewerlinc
        | HandlerName::Claimtrackerlinc => "No claims found",
    }
}

fn draft<P: Serialize>(
    task: &str,
    subject: Option<String>,
    payload: &P,
) -> (String, Option<String>, JsonValue) {
    // Payload structs hold only strings, numbers and model types with derived Serialize
    let payload = serde_json::to_value(payload).unwrap_or(JsonValue::Null);
    (task.to_string(), subject, payload)
}

fn reference_id(reference: Option<&Reference>) -> String {
    reference
        .and_then(Reference::id_or_identifier)
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Serialize)]
struct ClaimPayload {
    patient_id: String,
    provider_id: String,
    service_date: Option<String>,
    diagnosis_codes: Vec<String>,
    procedure_codes: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    insurance_id: String,
    notes: String,
}

impl From<&ClaimRecord> for ClaimPayload {
    fn from(claim: &ClaimRecord) -> Self {
        Self {
            patient_id: reference_id(claim.patient.as_ref()),
            provider_id: reference_id(claim.provider.as_ref()),
            service_date: claim.created.clone(),
            diagnosis_codes: claim.diagnosis_codes(),
            procedure_codes: claim.procedure_codes(),
            total_amount: claim.total_amount(),
            insurance_id: claim
                .primary_coverage()
                .and_then(|r| r.reference.clone())
                .unwrap_or_default(),
            notes: format!("NPHIES Claim ID: {}", claim.id.as_deref().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Serialize)]
struct PatientPayload {
    first_name: String,
    last_name: String,
    birth_date: Option<String>,
    gender: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: PostalAddress,
    identifiers: Vec<Identifier>,
    nationality: Option<String>,
    occupation: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct PostalAddress {
    line: Vec<String>,
    city: Option<String>,
    state: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    country: Option<String>,
}

impl From<&Address> for PostalAddress {
    fn from(address: &Address) -> Self {
        Self {
            line: address.line.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

impl From<&PatientRecord> for PatientPayload {
    fn from(patient: &PatientRecord) -> Self {
        let name = patient.primary_name();
        Self {
            first_name: name
                .and_then(|n| n.first_given())
                .unwrap_or_default()
                .to_string(),
            last_name: name
                .and_then(|n| n.family.clone())
                .unwrap_or_default(),
            birth_date: patient.birth_date.clone(),
            gender: patient.gender.clone(),
            phone: patient.contact("phone").map(str::to_string),
            email: patient.contact("email").map(str::to_string),
            address: patient
                .addresses
                .first()
                .map(PostalAddress::from)
                .unwrap_or_default(),
            identifiers: patient.identifiers.clone(),
            nationality: patient.nationality.clone(),
            occupation: patient.occupation.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EligibilityPayload {
    eligibility_id: Option<String>,
    patient_id: String,
    provider_id: String,
    insurer_id: String,
    purpose: Vec<String>,
    service_period: Option<Period>,
    service_date: Option<String>,
    insurance_info: Vec<EligibilityInsurance>,
}

impl From<&EligibilityRequestRecord> for EligibilityPayload {
    fn from(request: &EligibilityRequestRecord) -> Self {
        Self {
            eligibility_id: request.id.clone(),
            patient_id: reference_id(request.patient.as_ref()),
            provider_id: reference_id(request.provider.as_ref()),
            insurer_id: reference_id(request.insurer.as_ref()),
            purpose: request.purpose.clone(),
            service_period: request.serviced_period.clone(),
            service_date: request.serviced_date.clone(),
            insurance_info: request.insurance.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PreauthPayload {
    claim_id: Option<String>,
    patient_id: String,
    provider_id: String,
    procedures: Vec<String>,
    diagnoses: Vec<Diagnosis>,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
}

impl From<&ClaimRecord> for PreauthPayload {
    fn from(claim: &ClaimRecord) -> Self {
        Self {
            claim_id: claim.id.clone(),
            patient_id: reference_id(claim.patient.as_ref()),
            provider_id: reference_id(claim.provider.as_ref()),
            procedures: claim.procedure_codes(),
            diagnoses: claim.diagnosis.clone(),
            total_amount: claim.total_amount(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NotificationPayload {
    recipient_type: &'static str,
    message_type: &'static str,
    subject: String,
    content: String,
    priority: Option<String>,
    sender_id: String,
    recipient_ids: Vec<String>,
}

impl From<&CommunicationRequestRecord> for NotificationPayload {
    fn from(comm: &CommunicationRequestRecord) -> Self {
        Self {
            recipient_type: "provider",
            message_type: "communication_request",
            subject: format!(
                "NPHIES Communication Request - {}",
                comm.id.as_deref().unwrap_or_default()
            ),
            content: comm.content_text(),
            priority: comm.priority.clone(),
            sender_id: reference_id(comm.sender.as_ref()),
            recipient_ids: comm
                .recipients
                .iter()
                .map(|r| reference_id(Some(r)))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DocumentationPayload {
    claim_id: Option<String>,
    patient_id: String,
    supporting_info: Vec<SupportingInfo>,
    diagnosis_codes: Vec<String>,
    procedure_codes: Vec<String>,
}

impl From<&ClaimRecord> for DocumentationPayload {
    fn from(claim: &ClaimRecord) -> Self {
        Self {
            claim_id: claim.id.clone(),
            patient_id: reference_id(claim.patient.as_ref()),
            supporting_info: claim.supporting_info.clone(),
            diagnosis_codes: claim.diagnosis_codes(),
            procedure_codes: claim.procedure_codes(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchPayload {
    claim_id: Option<String>,
    patient_id: String,
    diagnosis_codes: Vec<String>,
    procedure_codes: Vec<String>,
    claim_type: String,
    service_date: Option<String>,
}

impl From<&ClaimRecord> for MatchPayload {
    fn from(claim: &ClaimRecord) -> Self {
        Self {
            claim_id: claim.id.clone(),
            patient_id: reference_id(claim.patient.as_ref()),
            diagnosis_codes: claim.diagnosis_codes(),
            procedure_codes: claim.procedure_codes(),
            claim_type: claim.type_code().unwrap_or_default().to_string(),
            service_date: claim.created.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewPayload {
    claim_id: Option<String>,
    provider_id: String,
    items: Vec<ReviewItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    currency: String,
}

#[derive(Debug, Serialize)]
struct ReviewItem {
    procedure_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    net_amount: Decimal,
}

impl From<&ClaimRecord> for ReviewPayload {
    fn from(claim: &ClaimRecord) -> Self {
        let items = claim
            .items
            .iter()
            .map(|item| {
                let unit_price = item.unit_price.as_ref().map(|m| m.value).unwrap_or_default();
                let quantity = item.quantity.unwrap_or(Decimal::ONE);
                // Absent net is priced from the line
                let net_amount = item
                    .net
                    .as_ref()
                    .map(|m| m.value)
                    .or_else(|| unit_price.checked_mul(quantity))
                    .unwrap_or_default();
                ReviewItem {
                    procedure_code: item.procedure_code().unwrap_or_default().to_string(),
                    unit_price,
                    quantity,
                    net_amount,
                }
            })
            .collect();

        Self {
            claim_id: claim.id.clone(),
            provider_id: reference_id(claim.provider.as_ref()),
            items,
            total_amount: claim.total_amount(),
            currency: claim.currency().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrackerPayload {
    claim_id: Option<String>,
    patient_id: String,
    provider_id: String,
    service_date: Option<String>,
    procedure_codes: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    claim_type: String,
    claim_use: Option<String>,
}

impl From<&ClaimRecord> for TrackerPayload {
    fn from(claim: &ClaimRecord) -> Self {
        Self {
            claim_id: claim.id.clone(),
            patient_id: reference_id(claim.patient.as_ref()),
            provider_id: reference_id(claim.provider.as_ref()),
            service_date: claim.created.clone(),
            procedure_codes: claim.procedure_codes(),
            total_amount: claim.total_amount(),
            claim_type: claim.type_code().unwrap_or_default().to_string(),
            claim_use: claim.claim_use.clone(),
        }
    }
}
