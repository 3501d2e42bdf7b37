//! Patient projection

use super::datatypes::{
    identifier_value, Address, Coding, ContactPoint, HumanName, Identifier, IdentifierKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    pub active: bool,

    #[serde(default)]
    pub names: Vec<HumanName>,

    #[serde(default)]
    pub telecom: Vec<ContactPoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default)]
    pub addresses: Vec<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<Coding>,

    /// Code from the nationality extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    /// Code from the occupation extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            id: None,
            identifiers: Vec::new(),
            active: true,
            names: Vec::new(),
            telecom: Vec::new(),
            gender: None,
            birth_date: None,
            addresses: Vec::new(),
            marital_status: None,
            nationality: None,
            occupation: None,
        }
    }
}

impl PatientRecord {
    pub fn primary_name(&self) -> Option<&HumanName> {
        self.names.first()
    }

    pub fn national_id(&self) -> Option<&str> {
        identifier_value(&self.identifiers, IdentifierKind::NationalId)
    }

    pub fn iqama(&self) -> Option<&str> {
        identifier_value(&self.identifiers, IdentifierKind::Iqama)
    }

    pub fn medical_record_number(&self) -> Option<&str> {
        identifier_value(&self.identifiers, IdentifierKind::MedicalRecordNumber)
    }

    /// First telecom value for the given contact system (`phone`, `email`, ...).
    pub fn contact(&self, system: &str) -> Option<&str> {
        self.telecom
            .iter()
            .find(|t| t.system.as_deref() == Some(system))
            .and_then(|t| t.value.as_deref())
    }
}
