//! Coverage projection

use super::datatypes::{Coding, Identifier, Period, Reference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageClass {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub class_type: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub coverage_type: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_holder: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(default)]
    pub payors: Vec<Reference>,

    #[serde(default)]
    pub classes: Vec<CoverageClass>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}
