//! Per-bundle extraction snapshot

use super::claim::ClaimRecord;
use super::clinical::{EncounterRecord, LocationRecord, MedicationRequestRecord, PractitionerRecord};
use super::communication::CommunicationRequestRecord;
use super::coverage::CoverageRecord;
use super::eligibility::EligibilityRequestRecord;
use super::header::MessageHeaderRecord;
use super::message_type::MessageType;
use super::organization::OrganizationRecord;
use super::patient::PatientRecord;
use serde::{Deserialize, Serialize};

/// A bundle entry that was skipped during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionWarning {
    /// Position of the entry in `Bundle.entry`
    pub index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    pub reason: String,
}

/// Canonical content of one inbound bundle.
///
/// Built once by the aggregator and shared read-only afterwards. Every
/// collection keeps bundle entry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    pub message_type: MessageType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_header: Option<MessageHeaderRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,

    /// `Bundle.timestamp` as received
    pub timestamp: Option<String>,

    #[serde(default)]
    pub patients: Vec<PatientRecord>,

    #[serde(default)]
    pub organizations: Vec<OrganizationRecord>,

    #[serde(default)]
    pub coverages: Vec<CoverageRecord>,

    #[serde(default)]
    pub claims: Vec<ClaimRecord>,

    #[serde(default)]
    pub eligibility_requests: Vec<EligibilityRequestRecord>,

    #[serde(default)]
    pub communications: Vec<CommunicationRequestRecord>,

    #[serde(default)]
    pub practitioners: Vec<PractitionerRecord>,

    #[serde(default)]
    pub encounters: Vec<EncounterRecord>,

    #[serde(default)]
    pub locations: Vec<LocationRecord>,

    #[serde(default)]
    pub medication_requests: Vec<MedicationRequestRecord>,

    #[serde(default)]
    pub warnings: Vec<ExtractionWarning>,
}

/// Number of records per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCounts {
    pub patients: usize,
    pub organizations: usize,
    pub coverages: usize,
    pub claims: usize,
    pub eligibility_requests: usize,
    pub communications: usize,
    pub practitioners: usize,
    pub encounters: usize,
    pub locations: usize,
    pub medication_requests: usize,
    pub skipped_entries: usize,
}

impl ExtractedData {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            ..Default::default()
        }
    }

    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            patients: self.patients.len(),
            organizations: self.organizations.len(),
            coverages: self.coverages.len(),
            claims: self.claims.len(),
            eligibility_requests: self.eligibility_requests.len(),
            communications: self.communications.len(),
            practitioners: self.practitioners.len(),
            encounters: self.encounters.len(),
            locations: self.locations.len(),
            medication_requests: self.medication_requests.len(),
            skipped_entries: self.warnings.len(),
        }
    }

    /// Focus references of the inbound MessageHeader, if any.
    pub fn focus(&self) -> &[super::datatypes::Reference] {
        self.message_header
            .as_ref()
            .map(|h| h.focus.as_slice())
            .unwrap_or(&[])
    }
}
