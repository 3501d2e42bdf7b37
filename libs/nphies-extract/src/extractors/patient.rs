use super::common::{
    addresses, boolean, concept_field, contact_points, extension_code, extensions, human_names,
    identifiers, string, Object,
};
use super::FromResource;
use nphies_models::PatientRecord;

impl FromResource for PatientRecord {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn from_object(resource: &Object) -> Self {
        let mut nationality = None;
        let mut occupation = None;
        for (url, ext) in extensions(resource) {
            if url.contains("nationality") {
                nationality = extension_code(ext);
            } else if url.contains("occupation") {
                occupation = extension_code(ext);
            }
        }

        PatientRecord {
            id: string(resource, "id"),
            identifiers: identifiers(resource),
            active: boolean(resource, "active").unwrap_or(true),
            names: human_names(resource),
            telecom: contact_points(resource),
            gender: string(resource, "gender"),
            birth_date: string(resource, "birthDate"),
            addresses: addresses(resource),
            marital_status: concept_field(resource, "maritalStatus"),
            nationality,
            occupation,
        }
    }
}
