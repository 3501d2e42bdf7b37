//! Shared value types used by every canonical record

use serde::{Deserialize, Serialize};

pub use rust_decimal::Decimal;

/// Default currency for NPHIES monetary amounts
pub const DEFAULT_CURRENCY: &str = "SAR";

/// A single code from a code system.
///
/// Coded concepts are flattened to their first coding during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_none() && self.code.is_none() && self.display.is_none()
    }
}

/// Opaque reference to another resource (`Type/id`, `urn:uuid:...` or absolute URL).
///
/// References are never resolved against the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Logical identifier value, for references that carry one instead of a literal link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            identifier: None,
            display: None,
        }
    }

    /// The trailing id segment of the literal reference.
    ///
    /// `Patient/123` and `http://provider.sa/fhir/Patient/123` both yield `123`;
    /// a `urn:uuid:` reference is returned whole.
    pub fn local_id(&self) -> Option<&str> {
        let reference = self.reference.as_deref()?;
        if reference.starts_with("urn:") {
            return Some(reference);
        }
        reference.rsplit('/').next().filter(|id| !id.is_empty())
    }

    /// The resource type segment of a relative or absolute literal reference.
    pub fn resource_type(&self) -> Option<&str> {
        let reference = self.reference.as_deref()?;
        let mut segments = reference.rsplit('/');
        segments.next()?;
        segments.next()
    }

    /// Local id if present, otherwise the logical identifier value.
    pub fn id_or_identifier(&self) -> Option<&str> {
        self.local_id().or(self.identifier.as_deref())
    }
}

/// Monetary amount. The currency defaults to SAR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,

    pub currency: String,
}

impl Money {
    pub fn sar(value: Decimal) -> Self {
        Self {
            value,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::sar(Decimal::ZERO)
    }
}

/// Time range with optional bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Identifier category, derived from the identifier system URI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    NationalId,
    Iqama,
    Passport,
    MedicalRecordNumber,
    ProviderLicense,
    PayerLicense,
    PractitionerLicense,
    #[default]
    Other,
}

impl IdentifierKind {
    /// Classify an identifier by case-insensitive substring match on its system.
    pub fn from_system(system: &str) -> Self {
        let system = system.to_ascii_lowercase();
        if system.contains("nationalid") {
            IdentifierKind::NationalId
        } else if system.contains("iqama") {
            IdentifierKind::Iqama
        } else if system.contains("passport") {
            IdentifierKind::Passport
        } else if system.contains("mrn") {
            IdentifierKind::MedicalRecordNumber
        } else if system.contains("provider-license") {
            IdentifierKind::ProviderLicense
        } else if system.contains("payer-license") {
            IdentifierKind::PayerLicense
        } else if system.contains("practitioner-license") {
            IdentifierKind::PractitionerLicense
        } else {
            IdentifierKind::Other
        }
    }

    pub fn is_license(&self) -> bool {
        matches!(
            self,
            IdentifierKind::ProviderLicense
                | IdentifierKind::PayerLicense
                | IdentifierKind::PractitionerLicense
        )
    }

    /// Check a value against the NPHIES format for this kind.
    ///
    /// Returns `None` for kinds that have no format rule.
    pub fn check_format(&self, value: &str) -> Option<bool> {
        let ten_digits = value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit());
        let citizen_prefix = value.starts_with('1') || value.starts_with('2');
        match self {
            IdentifierKind::NationalId => Some(ten_digits && citizen_prefix),
            IdentifierKind::Iqama => Some(ten_digits && !citizen_prefix),
            IdentifierKind::ProviderLicense => {
                Some(value.starts_with("N-F-") || value.starts_with("PR-"))
            }
            IdentifierKind::PayerLicense => {
                Some(value.starts_with("N-I-") || value.starts_with("INS-"))
            }
            IdentifierKind::PractitionerLicense => {
                Some(value.starts_with("N-P-") || value.starts_with("MDH-"))
            }
            IdentifierKind::Passport | IdentifierKind::MedicalRecordNumber | IdentifierKind::Other => {
                None
            }
        }
    }
}

/// Business identifier with its derived category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    pub kind: IdentifierKind,

    /// Result of the format check for kinds that have one; never used to reject data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

impl Identifier {
    /// Build an identifier, deriving `kind` and `valid` from system and value.
    pub fn new(system: Option<String>, value: Option<String>) -> Self {
        let kind = system
            .as_deref()
            .map(IdentifierKind::from_system)
            .unwrap_or_default();
        let valid = value.as_deref().and_then(|v| kind.check_format(v));
        Self {
            system,
            value,
            kind,
            valid,
        }
    }
}

/// Find the value of the first identifier of `kind`.
pub fn identifier_value(identifiers: &[Identifier], kind: IdentifierKind) -> Option<&str> {
    identifiers
        .iter()
        .find(|i| i.kind == kind)
        .and_then(|i| i.value.as_deref())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suffix: Vec<String>,
}

impl HumanName {
    pub fn first_given(&self) -> Option<&str> {
        self.given.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub contact_use: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub address_use: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}
