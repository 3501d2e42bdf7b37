//! End-to-end extraction of fixture bundles

use nphies_extract::{classify, extract_bundle, ClassificationSource, EntryError};
use nphies_models::{Decimal, IdentifierKind, MessageType, OrganizationKind};
use serde_json::Value;

fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_claim_request_bundle() {
    let bundle = fixture("claim-request.json");
    let data = extract_bundle(&bundle).unwrap();

    assert_eq!(data.message_type, MessageType::ClaimRequest);
    assert_eq!(data.bundle_id.as_deref(), Some("b7c1d6a2-claim"));
    assert_eq!(data.timestamp.as_deref(), Some("2026-03-02T10:15:00+03:00"));
    assert!(data.warnings.is_empty());

    let header = data.message_header.as_ref().unwrap();
    assert_eq!(header.event_code(), Some("claim-request"));
    assert_eq!(data.focus()[0].local_id(), Some("claim-1"));

    let claim = &data.claims[0];
    assert!(claim.is_claim());
    assert_eq!(claim.procedure_codes(), vec!["30571-00-00", "92514-99-00"]);
    assert_eq!(claim.total_amount(), Decimal::new(50005, 1));
    assert_eq!(claim.items[1].unit_price.as_ref().unwrap().currency, "SAR");

    let patient = &data.patients[0];
    assert_eq!(patient.national_id(), Some("1098765432"));
    assert_eq!(patient.identifiers[0].kind, IdentifierKind::NationalId);
    assert_eq!(patient.identifiers[0].valid, Some(true));

    let kinds: Vec<_> = data.organizations.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, vec![OrganizationKind::Provider, OrganizationKind::Insurer]);

    assert_eq!(data.coverages[0].subscriber_id.as_deref(), Some("SUB-778"));
    assert_eq!(data.encounters.len(), 1);

    let counts = data.counts();
    assert_eq!(counts.claims, 1);
    assert_eq!(counts.organizations, 2);
    assert_eq!(counts.skipped_entries, 0);
}

#[test]
fn test_eligibility_without_header_is_inferred() {
    let bundle = fixture("eligibility-no-header.json");

    let classification = classify(&bundle);
    assert_eq!(classification.message_type, MessageType::EligibilityRequest);
    assert_eq!(classification.source, ClassificationSource::Inferred);

    let data = extract_bundle(&bundle).unwrap();
    assert_eq!(data.message_type, MessageType::EligibilityRequest);
    assert!(data.message_header.is_none());
    assert!(data.timestamp.is_none());
    assert_eq!(data.eligibility_requests[0].purpose, vec!["benefits", "validation"]);
    assert_eq!(data.patients[0].iqama(), Some("2345678901"));
}

#[test]
fn test_entry_without_resource_type_is_skipped() {
    let bundle = fixture("missing-resource-type.json");
    let data = extract_bundle(&bundle).unwrap();

    assert_eq!(data.message_type, MessageType::CommunicationRequest);
    assert_eq!(data.communications.len(), 1);
    assert_eq!(data.patients.len(), 1);

    assert_eq!(data.warnings.len(), 1);
    let warning = &data.warnings[0];
    assert_eq!(warning.index, 1);
    assert_eq!(warning.full_url.as_deref(), Some("urn:uuid:broken"));
    assert_eq!(warning.reason, EntryError::MissingResourceType.to_string());
}

#[test]
fn test_extraction_is_idempotent() {
    for name in [
        "claim-request.json",
        "eligibility-no-header.json",
        "missing-resource-type.json",
    ] {
        let bundle = fixture(name);
        let first = extract_bundle(&bundle).unwrap();
        let second = extract_bundle(&bundle).unwrap();
        assert_eq!(first, second, "{name}");
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}

#[test]
fn test_extracted_json_shape() {
    let data = extract_bundle(&fixture("eligibility-no-header.json")).unwrap();
    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json["messageType"], "eligibility-request");
    assert_eq!(json["timestamp"], Value::Null);
    assert_eq!(json["claims"], serde_json::json!([]));
    assert_eq!(json["medicationRequests"], serde_json::json!([]));
    assert!(json["eligibilityRequests"].is_array());
}
