//! Claim projection
//!
//! Covers institutional claims, prior authorizations and prescriber requests,
//! which NPHIES all carries as `Claim` resources distinguished by `use`.

use super::datatypes::{Coding, Decimal, Identifier, Money, Reference, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Claim.use` value for a claim submission
pub const USE_CLAIM: &str = "claim";
/// `Claim.use` value for a prior authorization
pub const USE_PREAUTHORIZATION: &str = "preauthorization";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTeamMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Coding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,

    /// `timingDate` or `timingPeriod.start`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,

    /// The untyped `value[x]` element, kept as received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub diagnosis_type: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_admission: Option<Coding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInsurance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    pub focal: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_or_service: Option<Coding>,

    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serviced_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnosis_sequence: Vec<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub care_team_sequence: Vec<u32>,
}

impl ClaimItem {
    pub fn procedure_code(&self) -> Option<&str> {
        self.product_or_service.as_ref().and_then(Coding::code)
    }
}

/// Values carried by NPHIES claim extensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimExtensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_offline_reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_offline_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub newborn: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounting_period: Option<String>,
}

impl ClaimExtensions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<Coding>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub claim_use: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,

    #[serde(default)]
    pub care_team: Vec<CareTeamMember>,

    #[serde(default)]
    pub supporting_info: Vec<SupportingInfo>,

    #[serde(default)]
    pub diagnosis: Vec<Diagnosis>,

    #[serde(default)]
    pub insurance: Vec<ClaimInsurance>,

    #[serde(default)]
    pub items: Vec<ClaimItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,

    #[serde(default, skip_serializing_if = "ClaimExtensions::is_empty")]
    pub extensions: ClaimExtensions,
}

/// Compact view of a claim used in processing summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "type")]
    pub claim_type: String,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub claim_use: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    pub currency: String,

    pub diagnosis_count: usize,

    pub item_count: usize,
}

impl ClaimRecord {
    pub fn is_claim(&self) -> bool {
        self.claim_use.as_deref() == Some(USE_CLAIM)
    }

    pub fn is_preauthorization(&self) -> bool {
        self.claim_use.as_deref() == Some(USE_PREAUTHORIZATION)
    }

    pub fn type_code(&self) -> Option<&str> {
        self.claim_type.as_ref().and_then(Coding::code)
    }

    pub fn diagnosis_codes(&self) -> Vec<String> {
        self.diagnosis
            .iter()
            .map(|d| d.code.as_ref().and_then(Coding::code).unwrap_or_default().to_string())
            .collect()
    }

    pub fn procedure_codes(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.procedure_code().unwrap_or_default().to_string())
            .collect()
    }

    pub fn total_amount(&self) -> Decimal {
        self.total.as_ref().map(|m| m.value).unwrap_or(Decimal::ZERO)
    }

    pub fn currency(&self) -> &str {
        self.total
            .as_ref()
            .map(|m| m.currency.as_str())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Coverage referenced by the first insurance entry.
    pub fn primary_coverage(&self) -> Option<&Reference> {
        self.insurance.first().and_then(|i| i.coverage.as_ref())
    }

    pub fn summary(&self) -> ClaimSummary {
        ClaimSummary {
            id: self.id.clone(),
            status: self.status.clone(),
            claim_type: self.type_code().unwrap_or("unknown").to_string(),
            claim_use: self.claim_use.clone(),
            created: self.created.clone(),
            total_amount: self.total_amount(),
            currency: self.currency().to_string(),
            diagnosis_count: self.diagnosis.len(),
            item_count: self.items.len(),
        }
    }
}
