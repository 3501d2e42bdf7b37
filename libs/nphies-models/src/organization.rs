//! Organization projection

use super::datatypes::{Coding, Identifier};
use serde::{Deserialize, Serialize};

/// Role of an organization in the exchange, from its type codings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationKind {
    Provider,
    Insurer,
    #[default]
    Unknown,
}

impl OrganizationKind {
    /// `prov` marks a provider and `ins` an insurer; any other code is ignored.
    pub fn from_type_code(code: &str) -> Option<Self> {
        match code {
            "prov" => Some(OrganizationKind::Provider),
            "ins" => Some(OrganizationKind::Insurer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    pub active: bool,

    pub kind: OrganizationKind,

    #[serde(default)]
    pub types: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Code from the provider-type extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

impl Default for OrganizationRecord {
    fn default() -> Self {
        Self {
            id: None,
            identifiers: Vec::new(),
            active: true,
            kind: OrganizationKind::Unknown,
            types: Vec::new(),
            name: None,
            provider_type: None,
        }
    }
}

impl OrganizationRecord {
    /// Provider, payer and practitioner license identifiers.
    pub fn licenses(&self) -> impl Iterator<Item = &Identifier> {
        self.identifiers.iter().filter(|i| i.kind.is_license())
    }
}
