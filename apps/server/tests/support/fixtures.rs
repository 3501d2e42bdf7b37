use serde_json::Value;

const CLAIM_REQUEST: &str =
    include_str!("../../../../libs/nphies-extract/tests/fixtures/claim-request.json");
const ELIGIBILITY_NO_HEADER: &str =
    include_str!("../../../../libs/nphies-extract/tests/fixtures/eligibility-no-header.json");
const MISSING_RESOURCE_TYPE: &str =
    include_str!("../../../../libs/nphies-extract/tests/fixtures/missing-resource-type.json");

fn parse(raw: &str) -> Value {
    serde_json::from_str(raw).expect("fixture is valid JSON")
}

/// Message bundle with a claim-request header and one institutional claim
pub fn claim_request_bundle() -> Value {
    parse(CLAIM_REQUEST)
}

/// Collection bundle with a CoverageEligibilityRequest and no MessageHeader
pub fn eligibility_bundle_without_header() -> Value {
    parse(ELIGIBILITY_NO_HEADER)
}

/// communication-request bundle with one entry lacking `resourceType`
pub fn communication_bundle_with_broken_entry() -> Value {
    parse(MISSING_RESOURCE_TYPE)
}
