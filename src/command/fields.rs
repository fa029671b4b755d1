//! Typed access to optional fields of the external JSON documents.
//!
//! Nothing here invents defaults; callers decide what an absent field means.
//! A field holding JSON `null` counts as absent.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DecodeError, SlabportError, ValidationError};

/// A decoded JSON object.
pub type Fields = Map<String, Value>;

pub const SLABS: &str = "slabs";
pub const ELEMENT_IDS: &str = "elementIds";
pub const ELEMENT_ID: &str = "elementId";
pub const SHAPE: &str = "shape";
pub const FLOOR_INDEX: &str = "floorIndex";
pub const STRUCTURE: &str = "structure";
pub const THICKNESS: &str = "thickness";
pub const REFERENCE_PLANE_LOCATION: &str = "referencePlaneLocation";
pub const EDGE_ANGLE_TYPE: &str = "edgeAngleType";
pub const EDGE_ANGLE: &str = "edgeAngle";

/// Views `value` as an object.
///
/// # Errors
///
/// Returns [`DecodeError::NotAnObject`] for any other JSON value.
pub fn as_fields(value: &Value) -> Result<&Fields, DecodeError> {
    value.as_object().ok_or(DecodeError::NotAnObject)
}

/// Returns `true` if `field` is present and not `null`.
#[must_use]
pub fn present(doc: &Fields, field: &str) -> bool {
    doc.get(field).is_some_and(|v| !v.is_null())
}

/// Decodes `field` if present.
///
/// # Errors
///
/// Returns [`DecodeError::WrongShape`] if the field is present but does not
/// decode as `T`.
pub fn get_optional<T: DeserializeOwned>(
    doc: &Fields,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => <T as Deserialize>::deserialize(value)
            .map(Some)
            .map_err(|source| DecodeError::WrongShape {
                field,
                expected: short_type_name::<T>(),
                source,
            }),
    }
}

/// Decodes a required `field`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] if the field is absent, or a
/// [`DecodeError`] if it has the wrong shape.
pub fn get<T: DeserializeOwned>(doc: &Fields, field: &'static str) -> Result<T, SlabportError> {
    get_optional(doc, field)?.ok_or_else(|| ValidationError::MissingField(field).into())
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn null_counts_as_absent() {
        let d = doc(json!({ "thickness": null, "floorIndex": 2 }));
        assert!(!present(&d, THICKNESS));
        assert!(present(&d, FLOOR_INDEX));
        assert!(!present(&d, SHAPE));
        assert_eq!(get_optional::<f64>(&d, THICKNESS).unwrap(), None);
    }

    #[test]
    fn get_optional_decodes_present_values() {
        let d = doc(json!({ "floorIndex": 2, "structure": "Basic" }));
        assert_eq!(get_optional::<i32>(&d, FLOOR_INDEX).unwrap(), Some(2));
        assert_eq!(
            get_optional::<String>(&d, STRUCTURE).unwrap().as_deref(),
            Some("Basic")
        );
    }

    #[test]
    fn wrong_shape_names_field_and_type() {
        let d = doc(json!({ "thickness": "thick" }));
        let err = get_optional::<f64>(&d, THICKNESS).unwrap_err();
        match err {
            DecodeError::WrongShape {
                field, expected, ..
            } => {
                assert_eq!(field, THICKNESS);
                assert_eq!(expected, "f64");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fractional_floor_index_is_rejected() {
        let d = doc(json!({ "floorIndex": 1.5 }));
        assert!(get_optional::<i32>(&d, FLOOR_INDEX).is_err());
    }

    #[test]
    fn required_field_missing() {
        let d = doc(json!({}));
        let err = get::<Vec<Value>>(&d, SLABS).unwrap_err();
        assert!(matches!(
            err,
            SlabportError::Validation(ValidationError::MissingField("slabs"))
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            as_fields(&json!([1, 2])),
            Err(DecodeError::NotAnObject)
        ));
    }
}
