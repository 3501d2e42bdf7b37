//! Lenient readers for FHIR datatypes
//!
//! Every reader treats a missing or wrongly-typed element as absent.

use nphies_models::{
    Address, Coding, ContactPoint, Decimal, HumanName, Identifier, Money, Period, Reference,
    DEFAULT_CURRENCY,
};
use serde_json::{Map, Value};
use std::str::FromStr;

pub(crate) type Object = Map<String, Value>;

pub(crate) fn string(obj: &Object, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn boolean(obj: &Object, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

pub(crate) fn positive_int(obj: &Object, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key).and_then(Value::as_object)
}

/// Elements of an array field; empty when the field is absent or not an array.
pub(crate) fn array<'a>(obj: &'a Object, key: &str) -> impl Iterator<Item = &'a Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter())
        .into_iter()
        .flatten()
}

/// Object elements of an array field.
pub(crate) fn objects<'a>(obj: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> {
    array(obj, key).filter_map(Value::as_object)
}

pub(crate) fn strings(obj: &Object, key: &str) -> Vec<String> {
    array(obj, key)
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// The first `<prefix>[x]` choice element, returned with its type suffix.
pub(crate) fn choice<'a>(obj: &'a Object, prefix: &str) -> Option<(&'a str, &'a Value)> {
    obj.iter().find_map(|(key, value)| {
        key.strip_prefix(prefix)
            .filter(|suffix| suffix.starts_with(|c: char| c.is_ascii_uppercase()))
            .map(|suffix| (suffix, value))
    })
}

pub(crate) fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

pub(crate) fn coding(value: &Value) -> Option<Coding> {
    let obj = value.as_object()?;
    let coding = Coding {
        system: string(obj, "system"),
        code: string(obj, "code"),
        display: string(obj, "display"),
    };
    (!coding.is_empty()).then_some(coding)
}

/// First coding of a CodeableConcept, or its text as a display-only coding.
pub(crate) fn concept(value: &Value) -> Option<Coding> {
    let obj = value.as_object()?;
    array(obj, "coding")
        .find_map(coding)
        .or_else(|| {
            string(obj, "text").map(|text| Coding {
                display: Some(text),
                ..Default::default()
            })
        })
}

pub(crate) fn concept_field(obj: &Object, key: &str) -> Option<Coding> {
    obj.get(key).and_then(concept)
}

/// First usable coding across a list of CodeableConcepts.
pub(crate) fn concepts(obj: &Object, key: &str) -> Vec<Coding> {
    array(obj, key).filter_map(concept).collect()
}

pub(crate) fn reference(value: &Value) -> Option<Reference> {
    let obj = value.as_object()?;
    let reference = Reference {
        reference: string(obj, "reference"),
        identifier: object(obj, "identifier").and_then(|i| string(i, "value")),
        display: string(obj, "display"),
    };
    (reference.reference.is_some() || reference.identifier.is_some() || reference.display.is_some())
        .then_some(reference)
}

pub(crate) fn reference_field(obj: &Object, key: &str) -> Option<Reference> {
    obj.get(key).and_then(reference)
}

pub(crate) fn references(obj: &Object, key: &str) -> Vec<Reference> {
    array(obj, key).filter_map(reference).collect()
}

pub(crate) fn identifiers(obj: &Object) -> Vec<Identifier> {
    objects(obj, "identifier")
        .map(|i| Identifier::new(string(i, "system"), string(i, "value")))
        .collect()
}

/// Money with the currency defaulted to SAR and a missing value read as zero.
pub(crate) fn money(value: &Value) -> Option<Money> {
    let obj = value.as_object()?;
    Some(Money {
        value: obj.get("value").and_then(decimal).unwrap_or(Decimal::ZERO),
        currency: string(obj, "currency").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    })
}

pub(crate) fn money_field(obj: &Object, key: &str) -> Option<Money> {
    obj.get(key).and_then(money)
}

pub(crate) fn period(value: &Value) -> Option<Period> {
    let obj = value.as_object()?;
    let period = Period {
        start: string(obj, "start"),
        end: string(obj, "end"),
    };
    (period.start.is_some() || period.end.is_some()).then_some(period)
}

pub(crate) fn period_field(obj: &Object, key: &str) -> Option<Period> {
    obj.get(key).and_then(period)
}

pub(crate) fn human_names(obj: &Object) -> Vec<HumanName> {
    objects(obj, "name")
        .map(|n| HumanName {
            name_use: string(n, "use"),
            text: string(n, "text"),
            family: string(n, "family"),
            given: strings(n, "given"),
            prefix: strings(n, "prefix"),
            suffix: strings(n, "suffix"),
        })
        .collect()
}

pub(crate) fn contact_points(obj: &Object) -> Vec<ContactPoint> {
    objects(obj, "telecom")
        .map(|t| ContactPoint {
            system: string(t, "system"),
            value: string(t, "value"),
            contact_use: string(t, "use"),
        })
        .collect()
}

pub(crate) fn address(obj: &Object) -> Address {
    Address {
        address_use: string(obj, "use"),
        text: string(obj, "text"),
        line: strings(obj, "line"),
        city: string(obj, "city"),
        district: string(obj, "district"),
        state: string(obj, "state"),
        postal_code: string(obj, "postalCode"),
        country: string(obj, "country"),
    }
}

pub(crate) fn addresses(obj: &Object) -> Vec<Address> {
    objects(obj, "address").map(address).collect()
}

/// `(url, extension)` pairs of the resource's extensions.
pub(crate) fn extensions<'a>(obj: &'a Object) -> impl Iterator<Item = (&'a str, &'a Object)> {
    objects(obj, "extension").filter_map(|ext| {
        ext.get("url")
            .and_then(Value::as_str)
            .map(|url| (url, ext))
    })
}

/// Code of an extension's `valueCodeableConcept`.
pub(crate) fn extension_code(ext: &Object) -> Option<String> {
    concept_field(ext, "valueCodeableConcept").and_then(|c| c.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_concept_takes_first_usable_coding() {
        let value = json!({
            "coding": [
                "not-an-object",
                {"system": "http://loinc.org", "code": "1234-5", "display": "Test"},
                {"system": "other", "code": "x"}
            ]
        });
        let coding = concept(&value).unwrap();
        assert_eq!(coding.code.as_deref(), Some("1234-5"));
        assert_eq!(coding.system.as_deref(), Some("http://loinc.org"));
    }

    #[test]
    fn test_concept_falls_back_to_text() {
        let coding = concept(&json!({"text": "Free text"})).unwrap();
        assert_eq!(coding.display.as_deref(), Some("Free text"));
        assert!(coding.code.is_none());
        assert!(concept(&json!({"coding": []})).is_none());
    }

    #[test]
    fn test_money_defaults() {
        let m = money(&json!({"value": 150.75})).unwrap();
        assert_eq!(m.value, Decimal::new(15075, 2));
        assert_eq!(m.currency, "SAR");

        let m = money(&json!({"currency": "USD"})).unwrap();
        assert_eq!(m.value, Decimal::ZERO);
        assert_eq!(m.currency, "USD");

        assert!(money(&json!(12)).is_none());
    }

    #[test]
    fn test_decimal_accepts_strings_and_exponents() {
        assert_eq!(decimal(&json!("10.5")), Some(Decimal::new(105, 1)));
        assert_eq!(decimal(&json!(1e3)), Some(Decimal::new(1000, 0)));
        assert_eq!(decimal(&json!(true)), None);
    }

    #[test]
    fn test_reference_with_identifier_only() {
        let r = reference(&json!({
            "identifier": {"system": "http://nphies.sa/license/payer-license", "value": "INS-1"}
        }))
        .unwrap();
        assert!(r.reference.is_none());
        assert_eq!(r.identifier.as_deref(), Some("INS-1"));
        assert!(reference(&json!({})).is_none());
    }

    #[test]
    fn test_wrongly_typed_fields_are_absent() {
        let o = obj(json!({
            "identifier": "nope",
            "name": {"family": "not-an-array"},
            "active": "yes",
            "telecom": [1, 2]
        }));
        assert!(identifiers(&o).is_empty());
        assert!(human_names(&o).is_empty());
        assert_eq!(boolean(&o, "active"), None);
        assert!(contact_points(&o).is_empty());
    }

    #[test]
    fn test_choice_requires_type_suffix() {
        let o = obj(json!({"valueless": 1, "valueString": "x"}));
        let (suffix, value) = choice(&o, "value").unwrap();
        assert_eq!(suffix, "String");
        assert_eq!(value, &json!("x"));
    }
}
