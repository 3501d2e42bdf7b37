//! Resource extractors
//!
//! One extractor per supported `resourceType`, each mapping a raw resource to
//! its canonical record. Extraction is best-effort: absent or malformed fields
//! become `None` or empty collections, and only a resource that is not a JSON
//! object is rejected.

mod claim;
mod clinical;
mod common;
mod communication;
mod coverage;
mod eligibility;
mod header;
mod organization;
mod patient;

use crate::error::EntryError;
use nphies_models::{
    ClaimRecord, CommunicationRequestRecord, CoverageRecord, EligibilityRequestRecord,
    EncounterRecord, ExtractedData, LocationRecord, MedicationRequestRecord, MessageHeaderRecord,
    OrganizationRecord, PatientRecord, PractitionerRecord,
};
use serde_json::{Map, Value};

/// Build a canonical record from one raw resource.
pub trait FromResource: Sized {
    /// The `resourceType` this extractor handles
    const RESOURCE_TYPE: &'static str;

    /// Project a resource object. Never fails; unreadable fields are left empty.
    fn from_object(resource: &Map<String, Value>) -> Self;

    fn extract(resource: &Value) -> Result<Self, EntryError> {
        resource
            .as_object()
            .map(Self::from_object)
            .ok_or(EntryError::ResourceNotAnObject)
    }
}

/// Resource types the aggregator recognises, keyed by `resourceType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    MessageHeader,
    Patient,
    Organization,
    Coverage,
    Claim,
    CoverageEligibilityRequest,
    CommunicationRequest,
    Practitioner,
    Encounter,
    Location,
    MedicationRequest,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::MessageHeader,
        ResourceKind::Patient,
        ResourceKind::Organization,
        ResourceKind::Coverage,
        ResourceKind::Claim,
        ResourceKind::CoverageEligibilityRequest,
        ResourceKind::CommunicationRequest,
        ResourceKind::Practitioner,
        ResourceKind::Encounter,
        ResourceKind::Location,
        ResourceKind::MedicationRequest,
    ];

    /// The `resourceType` declared by this kind's extractor
    pub fn resource_type(self) -> &'static str {
        match self {
            ResourceKind::MessageHeader => MessageHeaderRecord::RESOURCE_TYPE,
            ResourceKind::Patient => PatientRecord::RESOURCE_TYPE,
            ResourceKind::Organization => OrganizationRecord::RESOURCE_TYPE,
            ResourceKind::Coverage => CoverageRecord::RESOURCE_TYPE,
            ResourceKind::Claim => ClaimRecord::RESOURCE_TYPE,
            ResourceKind::CoverageEligibilityRequest => EligibilityRequestRecord::RESOURCE_TYPE,
            ResourceKind::CommunicationRequest => CommunicationRequestRecord::RESOURCE_TYPE,
            ResourceKind::Practitioner => PractitionerRecord::RESOURCE_TYPE,
            ResourceKind::Encounter => EncounterRecord::RESOURCE_TYPE,
            ResourceKind::Location => LocationRecord::RESOURCE_TYPE,
            ResourceKind::MedicationRequest => MedicationRequestRecord::RESOURCE_TYPE,
        }
    }

    /// Case-sensitive; unknown types are skipped by the aggregator.
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.resource_type() == resource_type)
    }

    pub fn extract(self, resource: &Value) -> Result<ExtractedResource, EntryError> {
        Ok(match self {
            ResourceKind::MessageHeader => {
                ExtractedResource::MessageHeader(MessageHeaderRecord::extract(resource)?)
            }
            ResourceKind::Patient => ExtractedResource::Patient(PatientRecord::extract(resource)?),
            ResourceKind::Organization => {
                ExtractedResource::Organization(OrganizationRecord::extract(resource)?)
            }
            ResourceKind::Coverage => {
                ExtractedResource::Coverage(CoverageRecord::extract(resource)?)
            }
            ResourceKind::Claim => ExtractedResource::Claim(ClaimRecord::extract(resource)?),
            ResourceKind::CoverageEligibilityRequest => {
                ExtractedResource::EligibilityRequest(EligibilityRequestRecord::extract(resource)?)
            }
            ResourceKind::CommunicationRequest => {
                ExtractedResource::Communication(CommunicationRequestRecord::extract(resource)?)
            }
            ResourceKind::Practitioner => {
                ExtractedResource::Practitioner(PractitionerRecord::extract(resource)?)
            }
            ResourceKind::Encounter => {
                ExtractedResource::Encounter(EncounterRecord::extract(resource)?)
            }
            ResourceKind::Location => {
                ExtractedResource::Location(LocationRecord::extract(resource)?)
            }
            ResourceKind::MedicationRequest => {
                ExtractedResource::MedicationRequest(MedicationRequestRecord::extract(resource)?)
            }
        })
    }
}

/// One extracted record, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedResource {
    MessageHeader(MessageHeaderRecord),
    Patient(PatientRecord),
    Organization(OrganizationRecord),
    Coverage(CoverageRecord),
    Claim(ClaimRecord),
    EligibilityRequest(EligibilityRequestRecord),
    Communication(CommunicationRequestRecord),
    Practitioner(PractitionerRecord),
    Encounter(EncounterRecord),
    Location(LocationRecord),
    MedicationRequest(MedicationRequestRecord),
}

impl ExtractedResource {
    /// Append the record to its collection. Only the first MessageHeader is kept.
    pub fn append_to(self, data: &mut ExtractedData) {
        match self {
            ExtractedResource::MessageHeader(header) => {
                if data.message_header.is_none() {
                    data.message_header = Some(header);
                }
            }
            ExtractedResource::Patient(r) => data.patients.push(r),
            ExtractedResource::Organization(r) => data.organizations.push(r),
            ExtractedResource::Coverage(r) => data.coverages.push(r),
            ExtractedResource::Claim(r) => data.claims.push(r),
            ExtractedResource::EligibilityRequest(r) => data.eligibility_requests.push(r),
            ExtractedResource::Communication(r) => data.communications.push(r),
            ExtractedResource::Practitioner(r) => data.practitioners.push(r),
            ExtractedResource::Encounter(r) => data.encounters.push(r),
            ExtractedResource::Location(r) => data.locations.push(r),
            ExtractedResource::MedicationRequest(r) => data.medication_requests.push(r),
        }
    }
}
