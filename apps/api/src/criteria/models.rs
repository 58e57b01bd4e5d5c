use std::fmt;

use serde::{Serialize, Serializer};

/// A single resume-evaluation rule.
///
/// Field order here is the field order of the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Criterion {
    pub name: String,
    /// Carried on the wire as `"Yes"` / `"No"`.
    #[serde(serialize_with = "serialize_yes_no")]
    pub must_have: bool,
    pub weight: Weight,
    pub description: String,
}

/// Relative importance of a criterion, a percentage in `[0, 100]`.
///
/// Keeps the text it was parsed from, so `"25.0%"` is exported and displayed
/// as `"25.0%"`, never re-rendered from the number.
#[derive(Debug, Clone, PartialEq)]
pub struct Weight {
    text: String,
    percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightError {
    MissingPercent,
    NotNumeric,
    OutOfRange,
}

impl Weight {
    /// Parses the `"X%"` form. Whitespace around the number is tolerated.
    pub fn parse(text: &str) -> Result<Self, WeightError> {
        let number = text
            .trim()
            .strip_suffix('%')
            .ok_or(WeightError::MissingPercent)?;
        let percent: f64 = number.trim().parse().map_err(|_| WeightError::NotNumeric)?;
        if !percent.is_finite() {
            return Err(WeightError::NotNumeric);
        }
        if !(0.0..=100.0).contains(&percent) {
            return Err(WeightError::OutOfRange);
        }
        Ok(Weight {
            text: text.to_string(),
            percent,
        })
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Reads a must-have flag. Only the exact strings `Yes` and `No` qualify.
pub fn parse_must_have(text: &str) -> Option<bool> {
    match text {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

pub fn must_have_label(must_have: bool) -> &'static str {
    if must_have {
        "Yes"
    } else {
        "No"
    }
}

fn serialize_yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(must_have_label(*value))
}

/// Ordered, validated, non-empty list of criteria from one generation call.
///
/// Only `validation::validate_criteria` constructs one, so every instance has
/// passed the schema checks. Order is the model's output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CriteriaSet(Vec<Criterion>);

impl CriteriaSet {
    pub(crate) fn from_validated(criteria: Vec<Criterion>) -> Self {
        debug_assert!(!criteria.is_empty());
        CriteriaSet(criteria)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    /// Sum of all weights, in percent. Expected to be near 100 but never enforced.
    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|c| c.weight.percent()).sum()
    }
}

impl<'a> IntoIterator for &'a CriteriaSet {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
