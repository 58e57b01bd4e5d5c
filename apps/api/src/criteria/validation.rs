//! Schema checks for a parsed model answer.
//!
//! All-or-nothing: the first violation rejects the whole batch. Elements are
//! checked in order, and fields within an element in the order
//! `name`, `must_have`, `weight`, `description`.

use serde_json::{Map, Value};

use crate::criteria::models::{parse_must_have, CriteriaSet, Criterion, Weight, WeightError};
use crate::errors::ValidationError;

pub const REQUIRED_FIELDS: [&str; 4] = ["name", "must_have", "weight", "description"];

/// Turns a parsed JSON array into a `CriteriaSet`, preserving order and content.
pub fn validate_criteria(values: Vec<Value>) -> Result<CriteriaSet, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::NoCriteria);
    }

    let criteria = values
        .iter()
        .enumerate()
        .map(|(i, value)| validate_criterion(i + 1, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CriteriaSet::from_validated(criteria))
}

fn validate_criterion(index: usize, value: &Value) -> Result<Criterion, ValidationError> {
    let object = value
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(ValidationError::MissingField { index, field });
        }
    }

    let name = required_text(object, index, "name")?;
    let must_have = must_have_flag(&object["must_have"], index)?;
    let weight = weight_value(&object["weight"], index)?;
    let description = required_text(object, index, "description")?;

    Ok(Criterion {
        name,
        must_have,
        weight,
        description,
    })
}

fn required_text(
    object: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    match &object[field] {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(ValidationError::InvalidField {
            index,
            field,
            reason: "must not be empty".to_string(),
        }),
        other => Err(ValidationError::InvalidField {
            index,
            field,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn must_have_flag(value: &Value, index: usize) -> Result<bool, ValidationError> {
    let flag = match value {
        Value::String(s) => parse_must_have(s),
        _ => None,
    };
    flag.ok_or_else(|| ValidationError::InvalidValue {
        index,
        field: "must_have",
        value: display_value(value),
    })
}

fn weight_value(value: &Value, index: usize) -> Result<Weight, ValidationError> {
    let text = match value {
        Value::String(s) => s,
        other => {
            return Err(ValidationError::WeightMissingPercent {
                index,
                value: display_value(other),
            })
        }
    };

    Weight::parse(text).map_err(|e| {
        let value = text.clone();
        match e {
            WeightError::MissingPercent => ValidationError::WeightMissingPercent { index, value },
            WeightError::NotNumeric => ValidationError::WeightNotNumeric { index, value },
            WeightError::OutOfRange => ValidationError::WeightOutOfRange { index, value },
        }
    })
}

/// Strings render without JSON quotes; everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
