use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `profiles` table. The four list sub-fields and `industries`
/// are stored as serialized JSON text and decoded on read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
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
    pub industries: Option<String>,
    pub primary_role: Option<String>,
    pub profile_pic: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub certifications: Option<String>,
    pub projects: Option<String>,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
