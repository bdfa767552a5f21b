//! Shape checks for loosely typed host payloads.
//!
//! Webview bridges hand over JSON values whose fields may carry any type.
//! These helpers turn them into typed requests, or reject them with the
//! same `ValidationError` the typed paths use.

use crate::model::annotation::NewAnnotation;
use crate::model::category::{AnnotationCategoryLink, NewCategory};
use crate::model::validation::{ensure_positive_id, ValidationError};
use serde_json::{Map, Value};

const EXPECTED_TEXT: &str = "a string";

/// Parses `{ "title": ..., "text"?: ..., "file"?: ... }`.
pub fn new_annotation_from_json(payload: &Value) -> Result<NewAnnotation, ValidationError> {
    let object = payload
        .as_object()
        .ok_or(ValidationError::MissingTitle)?;

    let title = required_text(object, "title", ValidationError::MissingTitle)?;
    let annotation = NewAnnotation {
        title,
        text: optional_text(object, "text")?,
        file: optional_text(object, "file")?,
    };
    annotation.validate()?;
    Ok(annotation)
}

/// Parses `{ "name": ..., "description"?: ... }`.
pub fn new_category_from_json(payload: &Value) -> Result<NewCategory, ValidationError> {
    let object = payload.as_object().ok_or(ValidationError::MissingName)?;

    let category = NewCategory {
        name: required_text(object, "name", ValidationError::MissingName)?,
        description: optional_text(object, "description")?,
    };
    category.validate()?;
    Ok(category)
}

/// Parses two JSON numbers into a validated link.
///
/// Integral floats (`3.0`) are accepted; fractional or non-numeric values
/// are not.
pub fn link_from_json(
    annotation_id: &Value,
    category_id: &Value,
) -> Result<AnnotationCategoryLink, ValidationError> {
    Ok(AnnotationCategoryLink::new(
        positive_integer("annotationId", annotation_id)?,
        positive_integer("categoryId", category_id)?,
    ))
}

fn required_text(
    object: &Map<String, Value>,
    field: &'static str,
    missing: ValidationError,
) -> Result<String, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(missing),
        Some(Value::String(value)) if value.is_empty() => Err(missing),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: EXPECTED_TEXT,
        }),
    }
}

fn optional_text(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: EXPECTED_TEXT,
        }),
    }
}

fn positive_integer(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let rejected = || ValidationError::NonPositiveId {
        field,
        value: value.to_string(),
    };

    let Value::Number(number) = value else {
        return Err(rejected());
    };
    let integer = match number.as_i64() {
        Some(integer) => integer,
        None => {
            // `i64::MAX as f64` rounds up to 2^63, which `as i64` would saturate.
            let float = number.as_f64().ok_or_else(rejected)?;
            if float.fract() != 0.0 || float < 1.0 || float >= i64::MAX as f64 {
                return Err(rejected());
            }
            float as i64
        }
    };
    ensure_positive_id(field, integer)
}
