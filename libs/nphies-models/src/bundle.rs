//! Outbound Bundle model
//!
//! Inbound bundles are read as untyped JSON so that malformed entries can be
//! skipped one at a time. This typed form is used for the bundles we emit.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Profile every NPHIES message bundle declares
pub const NPHIES_BUNDLE_PROFILE: &str =
    "http://nphies.sa/fhir/ksa/nphies-fs/StructureDefinition/bundle|1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Serialized as an empty array when there are no entries
    #[serde(default)]
    pub entry: Vec<BundleEntry>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Message,
    Collection,
    Batch,
    BatchResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl BundleEntry {
    pub fn new(full_url: impl Into<String>, resource: Value) -> Self {
        Self {
            full_url: Some(full_url.into()),
            resource: Some(resource),
            extensions: HashMap::new(),
        }
    }
}

impl Bundle {
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: None,
            meta: None,
            bundle_type,
            timestamp: None,
            entry: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// A message bundle carrying the NPHIES bundle profile.
    pub fn nphies_message(id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        let mut bundle = Self::new(BundleType::Message);
        bundle.id = Some(id.into());
        bundle.timestamp = Some(timestamp.into());
        bundle.meta = Some(Meta {
            profile: vec![NPHIES_BUNDLE_PROFILE.to_string()],
        });
        bundle
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entry
    }

    pub fn add_entry(&mut self, entry: BundleEntry) {
        self.entry.push(entry);
    }

    /// The first entry resource with the given `resourceType`.
    pub fn find_resource(&self, resource_type: &str) -> Option<&Value> {
        self.entry
            .iter()
            .filter_map(|e| e.resource.as_ref())
            .find(|r| r.get("resourceType").and_then(Value::as_str) == Some(resource_type))
    }
}
