//! Property-based tests using QuickCheck

use nphies_extract::{classify, extract_bundle};
use nphies_models::MessageType;
use quickcheck::{QuickCheck, TestResult};
use serde_json::{json, Value};

const RESOURCE_TYPES: &[&str] = &[
    "Patient",
    "Organization",
    "Coverage",
    "Claim",
    "CoverageEligibilityRequest",
    "CommunicationRequest",
    "Practitioner",
    "Encounter",
    "Location",
    "MedicationRequest",
    "Observation",
    "",
];

/// Build a header-less bundle from arbitrary selectors; some entries are malformed.
fn bundle_from(selectors: &[u8]) -> Value {
    let entries: Vec<Value> = selectors
        .iter()
        .enumerate()
        .map(|(i, s)| match s % 16 {
            12 => json!("not-an-entry"),
            13 => json!({"fullUrl": format!("urn:uuid:{i}")}),
            14 => json!({"resource": {"id": format!("r{i}")}}),
            15 => json!({"resource": [i]}),
            n => json!({
                "fullUrl": format!("urn:uuid:{i}"),
                "resource": {"resourceType": RESOURCE_TYPES[n as usize], "id": format!("r{i}")}
            }),
        })
        .collect();
    json!({"resourceType": "Bundle", "type": "collection", "entry": entries})
}

/// Property: a header-less bundle always classifies to a known message type
#[test]
fn prop_headerless_classification_is_total() {
    fn prop(selectors: Vec<u8>) -> TestResult {
        let classification = classify(&bundle_from(&selectors));
        TestResult::from_bool(MessageType::ALL.contains(&classification.message_type))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<u8>) -> TestResult);
}

/// Property: any event code string either maps to itself or falls back to claim-request
#[test]
fn prop_event_code_mapping() {
    fn prop(code: String) -> TestResult {
        let bundle = json!({"entry": [{"resource": {
            "resourceType": "MessageHeader",
            "eventCoding": {"code": code}
        }}]});
        let message_type = classify(&bundle).message_type;
        let expected = MessageType::from_event_code(&code).unwrap_or(MessageType::ClaimRequest);
        TestResult::from_bool(message_type == expected)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: extraction is deterministic and accounts for every entry
#[test]
fn prop_extraction_idempotent() {
    fn prop(selectors: Vec<u8>) -> TestResult {
        let bundle = bundle_from(&selectors);
        let (Ok(first), Ok(second)) = (extract_bundle(&bundle), extract_bundle(&bundle)) else {
            return TestResult::failed();
        };

        let skipped = selectors.iter().filter(|s| *s % 16 >= 11).count();
        let ignored = selectors.iter().filter(|s| *s % 16 == 10).count();
        let counts = first.counts();
        let extracted = counts.patients
            + counts.organizations
            + counts.coverages
            + counts.claims
            + counts.eligibility_requests
            + counts.communications
            + counts.practitioners
            + counts.encounters
            + counts.locations
            + counts.medication_requests;

        TestResult::from_bool(
            first == second
                && counts.skipped_entries == skipped
                && extracted + skipped + ignored == selectors.len(),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<u8>) -> TestResult);
}
