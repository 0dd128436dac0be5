use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::export::formatter::{decode_list, decode_strings, parse_json_or};
use crate::lenient;
use crate::models::profile::ProfileRow;
use crate::skills::catalog::SkillCatalog;
use crate::skills::normalizer::{normalize_skills, SkillRecord};

const HM_ID_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub specialisation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub grade: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CertificationRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub provider: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub expiry: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tools: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub responsibility: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub awards: String,
}

/// A stored profile with its JSON sub-fields decoded into typed records.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub hm_id: String,
    pub name: String,
    pub competency: Option<String>,
    pub joining_date: Option<String>,
    pub total_exp_years: Option<i32>,
    pub total_exp_months: Option<i32>,
    pub relevant_exp_years: Option<i32>,
    pub relevant_exp_months: Option<i32>,
    pub reporting_location_type: Option<String>,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub office_city: Option<String>,
    pub industries: Vec<String>,
    pub primary_role: Option<String>,
    pub profile_pic: Option<String>,
    pub education: Vec<EducationRecord>,
    pub skills: Vec<SkillRecord>,
    pub certifications: Vec<CertificationRecord>,
    pub projects: Vec<ProjectRecord>,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Decodes a stored row. Malformed JSON text in any sub-field reads as an empty list.
    pub fn from_row(row: ProfileRow, catalog: &SkillCatalog) -> Self {
        let list = |raw: Option<&str>| parse_json_or(raw, Value::Array(Vec::new()));

        Profile {
            industries: decode_strings(&list(row.industries.as_deref())),
            education: decode_list(&list(row.education.as_deref())),
            skills: normalize_skills(catalog, &list(row.skills.as_deref())),
            certifications: decode_list(&list(row.certifications.as_deref())),
            projects: decode_list(&list(row.projects.as_deref())),
            id: row.id,
            hm_id: row.hm_id,
            name: row.name,
            competency: row.competency,
            joining_date: row.joining_date,
            total_exp_years: row.total_exp_years,
            total_exp_months: row.total_exp_months,
            relevant_exp_years: row.relevant_exp_years,
            relevant_exp_months: row.relevant_exp_months,
            reporting_location_type: row.reporting_location_type,
            customer_name: row.customer_name,
            customer_address: row.customer_address,
            office_city: row.office_city,
            primary_role: row.primary_role,
            profile_pic: row.profile_pic,
            approved: row.approved,
            approved_at: row.approved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn has_profile_pic(&self) -> bool {
        self.profile_pic
            .as_deref()
            .is_some_and(|pic| !pic.trim().is_empty())
    }
}

/// Body of `POST /api/profile`.
///
/// Every field except `hm_id` is tri-state: absent (`None`) leaves the stored
/// value alone, present overwrites it, and an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSubmission {
    #[serde(default, deserialize_with = "lenient::string")]
    pub hm_id: String,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub competency: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub joining_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_int")]
    pub total_exp_years: Option<Option<i32>>,
    #[serde(default, deserialize_with = "lenient::present_int")]
    pub total_exp_months: Option<Option<i32>>,
    #[serde(default, deserialize_with = "lenient::present_int")]
    pub relevant_exp_years: Option<Option<i32>>,
    #[serde(default, deserialize_with = "lenient::present_int")]
    pub relevant_exp_months: Option<Option<i32>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub reporting_location_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub customer_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub office_city: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub primary_role: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_string")]
    pub profile_pic: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::present_json")]
    pub industries: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present_json")]
    pub education: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present_json")]
    pub skills: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present_json")]
    pub certifications: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present_json")]
    pub projects: Option<Value>,
}

impl ProfileSubmission {
    /// Returns the trimmed external id, rejecting blank or oversized ids.
    pub fn validated_hm_id(&self) -> Result<String, AppError> {
        let hm_id = self.hm_id.trim();
        if hm_id.is_empty() {
            return Err(AppError::Validation("HM ID is required".to_string()));
        }
        if hm_id.chars().count() > HM_ID_MAX_LEN {
            return Err(AppError::Validation(format!(
                "HM ID must be at most {HM_ID_MAX_LEN} characters"
            )));
        }
        Ok(hm_id.to_string())
    }

    /// Applies the provided fields onto a stored row. Skills are normalized first.
    pub fn apply(self, row: &mut ProfileRow, catalog: &SkillCatalog) {
        if let Some(name) = self.name {
            row.name = name.unwrap_or_default();
        }
        set(&mut row.competency, self.competency);
        set(&mut row.joining_date, self.joining_date);
        set(&mut row.total_exp_years, self.total_exp_years);
        set(&mut row.total_exp_months, self.total_exp_months);
        set(&mut row.relevant_exp_years, self.relevant_exp_years);
        set(&mut row.relevant_exp_months, self.relevant_exp_months);
        set(&mut row.reporting_location_type, self.reporting_location_type);
        set(&mut row.customer_name, self.customer_name);
        set(&mut row.customer_address, self.customer_address);
        set(&mut row.office_city, self.office_city);
        set(&mut row.primary_role, self.primary_role);
        set(&mut row.profile_pic, self.profile_pic);

        if let Some(skills) = self.skills {
            let normalized = normalize_skills(catalog, &skills);
            row.skills = Some(to_json_text(&normalized));
        }
        for (target, value) in [
            (&mut row.industries, self.industries),
            (&mut row.education, self.education),
            (&mut row.certifications, self.certifications),
            (&mut row.projects, self.projects),
        ] {
            if let Some(value) = value {
                *target = Some(value.to_string());
            }
        }
    }
}

fn set<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value;
    }
}

fn to_json_text<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}
