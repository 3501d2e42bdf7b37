use super::common::{
    array, boolean, concepts, extension_code, extensions, identifiers, objects, string, Object,
};
use super::FromResource;
use nphies_models::{OrganizationKind, OrganizationRecord};
use serde_json::Value;

impl FromResource for OrganizationRecord {
    const RESOURCE_TYPE: &'static str = "Organization";

    fn from_object(resource: &Object) -> Self {
        let provider_type = extensions(resource)
            .filter(|(url, _)| url.contains("provider-type"))
            .find_map(|(_, ext)| extension_code(ext));

        // Every coding is considered, the last recognised code wins
        let kind = objects(resource, "type")
            .flat_map(|t| array(t, "coding"))
            .filter_map(|c| c.get("code").and_then(Value::as_str))
            .filter_map(OrganizationKind::from_type_code)
            .last()
            .unwrap_or_default();

        OrganizationRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            active: boolean(resource, "active").unwrap_or(true),
            kind,
            types: concepts(resource, "type"),
            name: string(resource, "name"),
            provider_type,
        }
    }
}
