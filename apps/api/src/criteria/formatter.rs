//! Renders a validated `CriteriaSet` for people and for files. Pure functions only.

use serde::Serialize;

use crate::criteria::models::{must_have_label, CriteriaSet};

/// Per-class counts and weight total, as shown next to a rendered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaSummary {
    pub total: usize,
    pub must_have: usize,
    pub nice_to_have: usize,
    /// Sum of all weights in percent. Near 100 for a well-formed answer.
    pub total_weight: f64,
}

pub fn summarize(criteria: &CriteriaSet) -> CriteriaSummary {
    let must_have = criteria.iter().filter(|c| c.must_have).count();
    CriteriaSummary {
        total: criteria.len(),
        must_have,
        nice_to_have: criteria.len() - must_have,
        total_weight: criteria.total_weight(),
    }
}

/// Canonical JSON export: a 2-space pretty-printed array with fields in the order
/// `name`, `must_have`, `weight`, `description`.
pub fn to_json_export(criteria: &CriteriaSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(criteria)
}

/// Human-readable rendering, one numbered block per criterion followed by the
/// total weight. Each block opens with a blank line; two more separate the last
/// block from the total.
///
/// ```text
///
/// **1. Go**
/// - Must-Have: Yes
/// - Weight: 40%
/// - Description: ...
///
///
/// **Total Weight: 100.0%**
/// ```
pub fn format_for_display(criteria: &CriteriaSet) -> String {
    let blocks: Vec<String> = criteria
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "\n**{}. {}**\n- Must-Have: {}\n- Weight: {}\n- Description: {}\n",
                i + 1,
                c.name,
                must_have_label(c.must_have),
                c.weight,
                c.description
            )
        })
        .collect();

    format!(
        "{}\n\n**Total Weight: {:.1}%**",
        blocks.join("\n"),
        criteria.total_weight()
    )
}
