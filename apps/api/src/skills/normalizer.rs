use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::skills::catalog::SkillCatalog;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrimarySecondary {
    #[default]
    Primary,
    Secondary,
}

impl PrimarySecondary {
    /// "secondary" in any case is `Secondary`; every other value falls back to `Primary`.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("secondary") {
            PrimarySecondary::Secondary
        } else {
            PrimarySecondary::Primary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimarySecondary::Primary => "Primary",
            PrimarySecondary::Secondary => "Secondary",
        }
    }
}

/// Years of experience with a skill, as typed by the employee.
/// The form sends either a number or free text; both are kept as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum YearsExp {
    Number(serde_json::Number),
    Text(String),
}

impl Default for YearsExp {
    fn default() -> Self {
        YearsExp::Text(String::new())
    }
}

impl YearsExp {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => YearsExp::Number(n.clone()),
            Some(Value::String(s)) => YearsExp::Text(s.clone()),
            _ => YearsExp::default(),
        }
    }

    /// Empty text and numeric zero carry no information.
    pub fn is_set(&self) -> bool {
        match self {
            YearsExp::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            YearsExp::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for YearsExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearsExp::Number(n) => write!(f, "{n}"),
            YearsExp::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical skill as persisted on a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillRecord {
    pub skill_id: Option<String>,
    pub skill_name: String,
    pub platform_group: Option<String>,
    #[serde(default)]
    pub primary_secondary: PrimarySecondary,
    #[serde(default)]
    pub years_exp: YearsExp,
    #[serde(default)]
    pub self_assessment: String,
}

impl SkillRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            skill_id: None,
            skill_name: name.into(),
            platform_group: None,
            primary_secondary: PrimarySecondary::Primary,
            years_exp: YearsExp::default(),
            self_assessment: String::new(),
        }
    }

    /// Lowercased, trimmed id if present, otherwise the lowercased, trimmed name.
    pub fn dedupe_key(&self) -> String {
        self.skill_id
            .as_deref()
            .unwrap_or(&self.skill_name)
            .trim()
            .to_lowercase()
    }
}

/// A partially filled skill object from a client or an older stored profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillInputRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub skill_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub skill_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub platform_group: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub primary_secondary: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub primary: Option<String>,
    #[serde(default)]
    pub years_exp: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub self_assessment: String,
}

/// One raw element of a submitted skill list.
#[derive(Debug, Clone)]
pub enum SkillInput {
    Name(String),
    Record(SkillInputRecord),
}

impl SkillInput {
    /// Strings and objects are skill inputs; every other JSON value is not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(SkillInput::Name(s.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .ok()
                .map(SkillInput::Record),
            _ => None,
        }
    }

    /// Canonical form before catalog enrichment. Explicit fields win over aliases.
    pub fn into_record(self) -> SkillRecord {
        match self {
            SkillInput::Name(name) => SkillRecord::named(name),
            SkillInput::Record(r) => SkillRecord {
                skill_id: r.skill_id,
                skill_name: r.skill_name.or(r.name).unwrap_or_default(),
                platform_group: r.platform_group,
                primary_secondary: r
                    .primary_secondary
                    .or(r.primary)
                    .map(|p| PrimarySecondary::parse(&p))
                    .unwrap_or_default(),
                years_exp: YearsExp::from_value(r.years_exp.as_ref()),
                self_assessment: r.self_assessment,
            },
        }
    }
}

impl From<SkillRecord> for SkillInput {
    fn from(record: SkillRecord) -> Self {
        let non_blank = |s: String| (!s.trim().is_empty()).then_some(s);
        SkillInput::Record(SkillInputRecord {
            skill_id: record.skill_id.and_then(non_blank),
            skill_name: non_blank(record.skill_name),
            name: None,
            platform_group: record.platform_group.and_then(non_blank),
            primary_secondary: Some(record.primary_secondary.as_str().to_string()),
            primary: None,
            years_exp: Some(match record.years_exp {
                YearsExp::Number(n) => Value::Number(n),
                YearsExp::Text(s) => Value::String(s),
            }),
            self_assessment: record.self_assessment,
        })
    }
}

/// Normalizes a raw JSON skill list. Anything other than an array yields an empty list.
pub fn normalize_skills(catalog: &SkillCatalog, raw: &Value) -> Vec<SkillRecord> {
    match raw {
        Value::Array(items) => {
            normalize_skill_inputs(catalog, items.iter().filter_map(SkillInput::from_value))
        }
        _ => Vec::new(),
    }
}

/// Coerces, enriches from the catalog, and deduplicates skills in input order.
/// Later duplicates are dropped whole; nothing is merged into the first occurrence.
pub fn normalize_skill_inputs(
    catalog: &SkillCatalog,
    inputs: impl IntoIterator<Item = SkillInput>,
) -> Vec<SkillRecord> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for input in inputs {
        let mut record = input.into_record();
        enrich(catalog, &mut record);

        let key = record.dedupe_key();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        normalized.push(record);
    }

    normalized
}

/// Fills a missing id or platform group from the catalog. Supplied values are kept.
fn enrich(catalog: &SkillCatalog, record: &mut SkillRecord) {
    let incomplete = record.skill_id.is_none() || record.platform_group.is_none();
    if !incomplete || record.skill_name.is_empty() {
        return;
    }
    if let Some(entry) = catalog.find_by_name(&record.skill_name) {
        if record.skill_id.is_none() {
            record.skill_id = Some(entry.skill_id.clone());
        }
        if record.platform_group.is_none() {
            record.platform_group = Some(entry.platform_group.clone());
        }
    }
}
