//! Prompt construction for criteria generation.
//! Reuses cross-cutting fragments from llm_client::prompts.

use crate::errors::ValidationError;
use crate::llm_client::prompts::{JSON_ARRAY_ONLY, RECRUITER_PERSONA};

/// Criteria generation prompt template.
/// Replace: {persona}, {job_role}, {jd_text}, {user_guidance}, {json_only}
///
/// Caller text is substituted in a single pass, so placeholder lookalikes inside a
/// job description or guidance are left alone.
pub const CRITERIA_PROMPT_TEMPLATE: &str = r#"{persona}

Your task is to deeply analyze the following Job Description (JD) and generate a structured set of **selection criteria** that will be used to evaluate candidate resumes.

You must:
- Identify both **explicitly stated** and **implicitly expected** skills, experiences, or qualities that a strong candidate should demonstrate for this role.
- Assign a **"Must-Have: Yes/No"** flag to each, based on whether the criterion is essential or simply desirable.
- Assign a **weight (%)** to each, reflecting its relative importance in the role.
- Provide a clear and detailed **description** of what should be visible in a resume to demonstrate each criterion (e.g., tools, certifications, years of experience, domain exposure, soft skills, etc.).

Think like an experienced recruiter:
- What would you expect from top candidates even if not directly mentioned in the JD?
- Include domain-specific soft skills, work styles, or team collaboration expectations if relevant.
- Differentiate between mission-critical requirements and value-adding qualities.

---

Job Role:
{job_role}

Job Description:
{jd_text}

Additional Instructions (optional):
{user_guidance}

---

Output Format:

Return a JSON array. Strictly follow this exact format:
[
  {
    "name": "Skill/Experience/Quality Name",
    "must_have": "Yes/No",
    "weight": "X%",
    "description": "Explain how this should be demonstrated in the resume. Include tools, technologies, or evidence you expect to find."
  }
]

HARD RULES:
1. Every object has exactly the fields "name", "must_have", "weight", "description"
2. "must_have" is the string "Yes" or the string "No"
3. "weight" is a string: a number between 0 and 100 followed by "%"
4. "name" and "description" are never empty
5. Ensure the total of all weights is close to 100%

{json_only}"#;

/// Renders the criteria prompt. Pure and deterministic.
///
/// Fails when the job role or the job description is empty or whitespace-only.
/// The guidance section is always present, empty when there is no guidance.
pub fn build_criteria_prompt(
    job_role: &str,
    jd_text: &str,
    user_guidance: &str,
) -> Result<String, ValidationError> {
    if job_role.trim().is_empty() {
        return Err(ValidationError::EmptyInput { field: "Job role" });
    }
    if jd_text.trim().is_empty() {
        return Err(ValidationError::EmptyInput {
            field: "Job description",
        });
    }

    let prompt = CRITERIA_PROMPT_TEMPLATE
        .replace("{persona}", RECRUITER_PERSONA)
        .replace("{json_only}", JSON_ARRAY_ONLY);

    Ok(fill_once(
        &prompt,
        &[
            ("{job_role}", job_role.trim()),
            ("{jd_text}", jd_text),
            ("{user_guidance}", user_guidance),
        ],
    ))
}

/// Substitutes each placeholder at its single position in `template`, in one
/// left-to-right pass, so substituted text is never searched again.
fn fill_once(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = slots
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "5+ years Go, distributed systems, on-call rotation";

    #[test]
    fn test_prompt_contains_description_and_guidance_verbatim() {
        let prompt =
            build_criteria_prompt("Senior Backend Engineer", JD, "Focus on reliability").unwrap();
        assert!(prompt.contains(JD));
        assert!(prompt.contains("Focus on reliability"));
        assert!(prompt.contains("Senior Backend Engineer"));
    }

    #[test]
    fn test_prompt_has_persona_and_output_contract() {
        let prompt = build_criteria_prompt("SRE", JD, "").unwrap();
        assert!(prompt.starts_with("You are an expert AI recruitment analyst."));
        for field in ["\"name\"", "\"must_have\"", "\"weight\"", "\"description\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("\"Yes/No\""));
        assert!(prompt.contains("\"X%\""));
        assert!(prompt.contains("Additional Instructions (optional):"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_criteria_prompt("SRE", JD, "no juniors").unwrap();
        let b = build_criteria_prompt("SRE", JD, "no juniors").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_placeholders_left_behind() {
        let prompt = build_criteria_prompt("SRE", JD, "").unwrap();
        for slot in ["{persona}", "{job_role}", "{jd_text}", "{user_guidance}", "{json_only}"] {
            assert!(!prompt.contains(slot), "unfilled {slot}");
        }
    }

    #[test]
    fn test_placeholder_lookalikes_in_description_are_kept() {
        let jd = "Templating with {user_guidance} style tokens";
        let prompt = build_criteria_prompt("Dev", jd, "GUIDE").unwrap();
        assert!(prompt.contains(jd));
        assert_eq!(prompt.matches("GUIDE").count(), 1);
    }

    #[test]
    fn test_empty_role_rejected() {
        let err = build_criteria_prompt("", JD, "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyInput { field: "Job role" });
    }

    #[test]
    fn test_whitespace_role_rejected_even_with_description() {
        assert!(build_criteria_prompt("  \t\n", JD, "guidance").is_err());
    }

    #[test]
    fn test_whitespace_description_rejected() {
        let err = build_criteria_prompt("SRE", "   \n  ", "").unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyInput {
                field: "Job description"
            }
        );
    }

    #[test]
    fn test_empty_role_and_description_reports_role_first() {
        let err = build_criteria_prompt(" ", "", "").unwrap_err();
        assert_eq!(err.field(), Some("Job role"));
    }
}
