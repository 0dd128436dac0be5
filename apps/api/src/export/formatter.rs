//! Flattens a profile's structured sub-fields into display text for tabular export.
//!
//! Every function here is total: missing or malformed input produces an empty
//! string or is skipped, never an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::lenient::value_to_string;
use crate::profiles::models::{CertificationRecord, EducationRecord, ProjectRecord};
use crate::skills::catalog::SkillCatalog;
use crate::skills::normalizer::{normalize_skill_inputs, SkillInput, SkillRecord};

const LIST_SEPARATOR: &str = "; ";
const FIELD_SEPARATOR: &str = " | ";
const META_SEPARATOR: &str = " — ";

/// Parses stored JSON text, falling back to `default` when the text is absent,
/// blank, or not valid JSON for `T`.
pub fn parse_json_or<T: DeserializeOwned>(raw: Option<&str>, default: T) -> T {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => serde_json::from_str(text).unwrap_or(default),
        _ => default,
    }
}

/// Decodes each object in a JSON array into `T`, skipping elements that don't fit.
/// Non-array values decode to an empty list.
pub fn decode_list<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Renders every element of a JSON array as text.
pub fn decode_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

/// Trims each value, drops empties, and joins the rest with "; ".
pub fn join_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_non_empty(values, LIST_SEPARATOR)
}

fn join_non_empty<I, S>(values: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|v| {
            let v = v.as_ref().trim();
            (!v.is_empty()).then(|| v.to_string())
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// `main — meta` when there is any meta, otherwise just `main`.
fn compose(main: &str, meta: &str) -> String {
    if meta.is_empty() {
        main.to_string()
    } else {
        format!("{main}{META_SEPARATOR}{meta}")
    }
}

fn labeled(label: &str, value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| format!("{label}{value}"))
}

/// One line per entry: `degree | specialisation | institution | year | grade`,
/// with empty fields left out.
pub fn format_education(entries: &[EducationRecord]) -> String {
    entries
        .iter()
        .map(|e| {
            join_non_empty(
                [&e.degree, &e.specialisation, &e.institution, &e.year, &e.grade],
                FIELD_SEPARATOR,
            )
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalizes the skills, then renders `<id> <name> — <group>; <P/S>; <N>y; <assessment>`.
pub fn format_skills(catalog: &SkillCatalog, skills: &[SkillRecord]) -> String {
    let normalized =
        normalize_skill_inputs(catalog, skills.iter().cloned().map(SkillInput::from));

    normalized
        .iter()
        .map(|s| {
            let main = format!(
                "{} {}",
                s.skill_id.as_deref().unwrap_or_default(),
                s.skill_name
            );
            let years = s.years_exp.is_set().then(|| format!("{}y", s.years_exp));
            let meta = join_list([
                s.platform_group.clone().unwrap_or_default(),
                s.primary_secondary.as_str().to_string(),
                years.unwrap_or_default(),
                s.self_assessment.clone(),
            ]);
            compose(main.trim(), &meta)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<name> — <provider>; Obtained: <date>; Expiry: <expiry>`, one line per certification.
pub fn format_certifications(certs: &[CertificationRecord]) -> String {
    certs
        .iter()
        .map(|c| {
            let meta = join_list(
                [
                    Some(c.provider.clone()),
                    labeled("Obtained: ", &c.date),
                    labeled("Expiry: ", &c.expiry),
                ]
                .into_iter()
                .flatten(),
            );
            compose(c.name.trim(), &meta)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header `title | role | duration` followed by labeled detail lines.
/// Projects are separated by a blank line.
pub fn format_projects(projects: &[ProjectRecord]) -> String {
    projects
        .iter()
        .filter_map(|p| {
            let header = join_non_empty([&p.title, &p.role, &p.duration], FIELD_SEPARATOR);
            let details: Vec<String> = [
                labeled("Tools: ", &p.tools),
                labeled("Desc: ", &p.description),
                labeled("Resp: ", &p.responsibility),
                labeled("Awards: ", &p.awards),
            ]
            .into_iter()
            .flatten()
            .collect();

            match (header.is_empty(), details.is_empty()) {
                (true, true) => None,
                (false, true) => Some(header),
                (true, false) => Some(details.join("\n")),
                (false, false) => Some(format!("{header}\n{}", details.join("\n"))),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn education(v: Value) -> Vec<EducationRecord> {
        decode_list(&v)
    }

    fn certs(v: Value) -> Vec<CertificationRecord> {
        decode_list(&v)
    }

    fn projects(v: Value) -> Vec<ProjectRecord> {
        decode_list(&v)
    }

    #[test]
    fn test_parse_json_or_falls_back() {
        let empty = || Value::Array(Vec::new());
        assert_eq!(parse_json_or(None, empty()), empty());
        assert_eq!(parse_json_or(Some(""), empty()), empty());
        assert_eq!(parse_json_or(Some("   "), empty()), empty());
        assert_eq!(parse_json_or(Some("[1, 2"), empty()), empty());
        assert_eq!(parse_json_or(Some("[1]"), empty()), json!([1]));
    }

    #[test]
    fn test_parse_json_or_type_mismatch_uses_default() {
        let parsed: Vec<String> = parse_json_or(Some(r#"{"a": 1}"#), vec!["fallback".into()]);
        assert_eq!(parsed, vec!["fallback"]);
    }

    #[test]
    fn test_decode_list_non_array_is_empty() {
        assert!(education(json!({"degree": "BSc"})).is_empty());
        assert!(education(Value::Null).is_empty());
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list([" a ", "", "b", "   "]), "a; b");
        assert_eq!(join_list(Vec::<String>::new()), "");
    }

    #[test]
    fn test_education_omits_empty_fields() {
        let out = format_education(&education(json!([{"degree": "BSc", "institution": "X"}])));
        assert_eq!(out, "BSc | X");
    }

    #[test]
    fn test_education_full_and_multiple() {
        let out = format_education(&education(json!([
            {"degree": "BE", "specialisation": "CS", "institution": "VTU", "year": 2015, "grade": "8.1"},
            {"degree": "", "institution": ""},
            {"degree": "ME", "year": "2018"}
        ])));
        assert_eq!(out, "BE | CS | VTU | 2015 | 8.1\nME | 2018");
    }

    #[test]
    fn test_skills_line_composition() {
        let catalog = SkillCatalog::builtin();
        let skills = crate::skills::normalizer::normalize_skills(
            &catalog,
            &json!([
                {"skill_name": "Python", "years_exp": 5, "self_assessment": "Expert"},
                {"name": "Cobol", "primary": "Secondary"},
                {"skill_name": "Hive", "years_exp": 0}
            ]),
        );
        let out = format_skills(&catalog, &skills);
        assert_eq!(
            out,
            "SK00056 Python — Base; Primary; 5y; Expert\n\
             Cobol — Secondary\n\
             SK00097 Hive — BigData; Primary"
        );
    }

    #[test]
    fn test_skills_are_normalized_before_formatting() {
        let catalog = SkillCatalog::builtin();
        let raw = vec![
            SkillRecord::named("python"),
            SkillRecord::named("Python"),
            SkillRecord::named(""),
        ];
        assert_eq!(format_skills(&catalog, &raw), "SK00056 python — Base; Primary");
    }

    #[test]
    fn test_certifications() {
        let out = format_certifications(&certs(json!([
            {"name": "AWS SAA", "provider": "AWS", "date": "2023-01-10", "expiry": "2026-01-10"},
            {"name": "CKA"}
        ])));
        assert_eq!(
            out,
            "AWS SAA — AWS; Obtained: 2023-01-10; Expiry: 2026-01-10\nCKA"
        );
    }

    #[test]
    fn test_certification_without_name_keeps_separator() {
        let out = format_certifications(&certs(json!([
            {"name": "", "provider": "Oracle"},
            {},
            {"name": "CKA"}
        ])));
        assert_eq!(out, " — Oracle\n\nCKA");
    }

    #[test]
    fn test_project_title_only() {
        assert_eq!(format_projects(&projects(json!([{"title": "Foo"}]))), "Foo");
    }

    #[test]
    fn test_project_title_and_description() {
        let out = format_projects(&projects(json!([
            {"title": "Foo", "description": "Built the ingestion layer"}
        ])));
        assert_eq!(out, "Foo\nDesc: Built the ingestion layer");
    }

    #[test]
    fn test_projects_full_and_separated() {
        let out = format_projects(&projects(json!([
            {
                "title": "Lakehouse",
                "role": "Lead",
                "duration": "Jan 2023 – Mar 2024",
                "tools": "Spark, Delta",
                "description": "Migration",
                "responsibility": "Design",
                "awards": "Spot award"
            },
            {},
            {"tools": "Airflow"}
        ])));
        assert_eq!(
            out,
            "Lakehouse | Lead | Jan 2023 – Mar 2024\n\
             Tools: Spark, Delta\nDesc: Migration\nResp: Design\nAwards: Spot award\n\n\
             Tools: Airflow"
        );
    }

    #[test]
    fn test_empty_inputs_render_empty() {
        assert_eq!(format_education(&[]), "");
        assert_eq!(format_skills(&SkillCatalog::builtin(), &[]), "");
        assert_eq!(format_certifications(&[]), "");
        assert_eq!(format_projects(&[]), "");
    }
}
