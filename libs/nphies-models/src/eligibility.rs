//! CoverageEligibilityRequest projection

use super::datatypes::{Coding, Identifier, Period, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityInsurance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequestRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,

    /// auth-requirements | benefits | discovery | validation
    #[serde(default)]
    pub purpose: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serviced_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serviced_period: Option<Period>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<Reference>,

    #[serde(default)]
    pub insurance: Vec<EligibilityInsurance>,

    /// From the newborn extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newborn: Option<bool>,
}
