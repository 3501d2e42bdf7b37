//! Static catalogue of the NPHIES profiles and code systems this crate reads

use nphies_models::MessageType;
use serde::ser::{Serialize, Serializer};

const STRUCTURE_DEFINITION_BASE: &str = "http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/";

/// `(profile URL, resourceType)`
pub const SUPPORTED_PROFILES: &[(&str, &str)] = &[
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/bundle", "Bundle"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/patient", "Patient"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/coverage", "Coverage"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/institutional-claim", "Claim"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/institutional-priorauth", "Claim"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/prescriber-priorauth", "Claim"),
    (
        "http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/eligibility-request",
        "CoverageEligibilityRequest",
    ),
    (
        "http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/communication-request",
        "CommunicationRequest",
    ),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/provider-organization", "Organization"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/insurer-organization", "Organization"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/practitioner", "Practitioner"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/encounter", "Encounter"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/location", "Location"),
    ("http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/medicationRequest", "MedicationRequest"),
];

/// `(code system URL, display name)`
pub const CODE_SYSTEMS: &[(&str, &str)] = &[
    ("http://nphies.sa/terminology/CodeSystem/ksa-message-events", "NPHIES Message Events"),
    ("http://nphies.sa/terminology/CodeSystem/coverage-type", "Coverage Types"),
    ("http://nphies.sa/terminology/CodeSystem/claim-subtype", "Claim Subtypes"),
    ("http://nphies.sa/terminology/CodeSystem/diagnosis-type", "Diagnosis Types"),
    (
        "http://nphies.sa/terminology/CodeSystem/claim-information-category",
        "Claim Information Categories",
    ),
    ("http://nphies.sa/terminology/CodeSystem/procedures", "NPHIES Procedures"),
    ("http://nphies.sa/terminology/CodeSystem/moh-category", "MOH Categories"),
    ("http://nphies.sa/terminology/CodeSystem/scientific-codes", "Scientific Codes"),
    ("http://nphies.sa/terminology/CodeSystem/practice-codes", "Practice Codes"),
    ("http://hl7.org/fhir/sid/icd-10-am", "ICD-10-AM"),
    ("http://loinc.org", "LOINC"),
];

/// Resource type constrained by a profile URL. A `|version` suffix is ignored.
pub fn profile_resource_type(url: &str) -> Option<&'static str> {
    let url = url.split('|').next().unwrap_or(url);
    SUPPORTED_PROFILES
        .iter()
        .find(|(profile, _)| *profile == url)
        .map(|(_, resource_type)| *resource_type)
}

/// Whether a URL names an NPHIES StructureDefinition at all, supported or not.
pub fn is_nphies_profile(url: &str) -> bool {
    url.starts_with(STRUCTURE_DEFINITION_BASE)
}

pub fn code_system_name(url: &str) -> Option<&'static str> {
    CODE_SYSTEMS
        .iter()
        .find(|(system, _)| *system == url)
        .map(|(_, name)| *name)
}

/// Serializable snapshot of the catalogue: `profiles` and `code_systems` as
/// URL-keyed objects in table order, plus every message type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalogue;

impl Serialize for Catalogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        struct Pairs(&'static [(&'static str, &'static str)]);

        impl Serialize for Pairs {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_map(self.0.iter().copied())
            }
        }

        let mut state = serializer.serialize_struct("Catalogue", 3)?;
        state.serialize_field("profiles", &Pairs(SUPPORTED_PROFILES))?;
        state.serialize_field("code_systems", &Pairs(CODE_SYSTEMS))?;
        state.serialize_field("message_types", &MessageType::ALL)?;
        state.end()
    }
}
