//! Extraction aggregator
//!
//! Walks `Bundle.entry` once, hands each resource to the extractor for its
//! `resourceType`, and collects the results into one [`ExtractedData`].

use crate::classify::classify_entries;
use crate::error::{EntryError, ParseError, Result};
use crate::extractors::ResourceKind;
use nphies_models::{ExtractedData, ExtractionWarning};
use serde_json::Value;

/// Extract a raw bundle into its canonical form.
///
/// Only a bundle that cannot be read as a whole is an error. Entries that
/// cannot be extracted are skipped and recorded in `warnings`; unknown
/// resource types are ignored.
pub fn extract_bundle(bundle: &Value) -> Result<ExtractedData> {
    let obj = bundle.as_object().ok_or(ParseError::NotAnObject)?;

    if let Some(resource_type) = obj.get("resourceType") {
        let resource_type = resource_type.as_str().unwrap_or_default();
        if resource_type != "Bundle" {
            return Err(ParseError::NotABundle(resource_type.to_string()));
        }
    }

    let entries = match obj.get("entry") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => return Err(ParseError::EntryNotArray),
    };

    let classification = classify_entries(entries);
    let mut data = ExtractedData::new(classification.message_type);
    data.bundle_id = string_field(bundle, "id");
    data.timestamp = string_field(bundle, "timestamp");

    for (index, entry) in entries.iter().enumerate() {
        let (resource_type, resource) = match entry_resource(entry) {
            Ok(found) => found,
            Err(err) => {
                skip_entry(&mut data, index, entry, None, err);
                continue;
            }
        };

        let Some(kind) = ResourceKind::from_resource_type(resource_type) else {
            tracing::debug!(index, resource_type, "Ignoring unsupported resource type");
            continue;
        };

        match kind.extract(resource) {
            Ok(record) => record.append_to(&mut data),
            Err(err) => skip_entry(&mut data, index, entry, Some(resource_type), err),
        }
    }

    tracing::debug!(
        message_type = %data.message_type,
        bundle_id = data.bundle_id.as_deref().unwrap_or(""),
        entries = entries.len(),
        skipped = data.warnings.len(),
        "Bundle extracted"
    );

    Ok(data)
}

fn entry_resource(entry: &Value) -> std::result::Result<(&str, &Value), EntryError> {
    let entry = entry.as_object().ok_or(EntryError::EntryNotAnObject)?;
    let resource = entry.get("resource").ok_or(EntryError::MissingResource)?;
    let resource_obj = resource
        .as_object()
        .ok_or(EntryError::ResourceNotAnObject)?;
    let resource_type = resource_obj
        .get("resourceType")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(EntryError::MissingResourceType)?;
    Ok((resource_type, resource))
}

fn skip_entry(
    data: &mut ExtractedData,
    index: usize,
    entry: &Value,
    resource_type: Option<&str>,
    err: EntryError,
) {
    let full_url = string_field(entry, "fullUrl");
    tracing::warn!(
        index,
        full_url = full_url.as_deref().unwrap_or(""),
        reason = %err,
        "Skipping bundle entry"
    );
    data.warnings.push(ExtractionWarning {
        index,
        full_url,
        resource_type: resource_type.map(str::to_string),
        reason: err.to_string(),
    });
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
