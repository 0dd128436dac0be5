use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::models::profile::ProfileRow;
use crate::profiles::approval::{transition, ApprovalChange, ApprovalState};
use crate::profiles::models::ProfileSubmission;
use crate::skills::catalog::SkillCatalog;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: i32,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    /// Clamps client paging input: pages start at 1, page size is 1..=MAX_PER_PAGE.
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ProfileStats {
    pub total_profiles: i64,
    pub by_role: BTreeMap<String, i64>,
    pub by_competency: BTreeMap<String, i64>,
}

/// Creates or partially updates the profile keyed by `hm_id` in one transaction.
///
/// The row is claimed with `INSERT .. ON CONFLICT DO NOTHING` and then locked,
/// so concurrent first submissions for the same id serialize on the lock.
pub async fn upsert_profile(
    pool: &PgPool,
    catalog: &SkillCatalog,
    hm_id: &str,
    submission: ProfileSubmission,
) -> sqlx::Result<UpsertOutcome> {
    let mut tx = pool.begin().await?;

    let inserted: Option<i32> = sqlx::query_scalar(
        "INSERT INTO profiles (hm_id) VALUES ($1) ON CONFLICT (hm_id) DO NOTHING RETURNING id",
    )
    .bind(hm_id)
    .fetch_optional(&mut *tx)
    .await?;

    let mut row: ProfileRow =
        sqlx::query_as("SELECT * FROM profiles WHERE hm_id = $1 FOR UPDATE")
            .bind(hm_id)
            .fetch_one(&mut *tx)
            .await?;

    submission.apply(&mut row, catalog);

    sqlx::query(
        r#"
        UPDATE profiles SET
            name = $2, competency = $3, joining_date = $4,
            total_exp_years = $5, total_exp_months = $6,
            relevant_exp_years = $7, relevant_exp_months = $8,
            reporting_location_type = $9, customer_name = $10,
            customer_address = $11, office_city = $12, industries = $13,
            primary_role = $14, profile_pic = $15, education = $16,
            skills = $17, certifications = $18, projects = $19,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(&row.competency)
    .bind(&row.joining_date)
    .bind(row.total_exp_years)
    .bind(row.total_exp_months)
    .bind(row.relevant_exp_years)
    .bind(row.relevant_exp_months)
    .bind(&row.reporting_location_type)
    .bind(&row.customer_name)
    .bind(&row.customer_address)
    .bind(&row.office_city)
    .bind(&row.industries)
    .bind(&row.primary_role)
    .bind(&row.profile_pic)
    .bind(&row.education)
    .bind(&row.skills)
    .bind(&row.certifications)
    .bind(&row.projects)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let created = inserted.is_some();
    info!(
        "{} profile {hm_id} (id {})",
        if created { "Created" } else { "Updated" },
        row.id
    );

    Ok(UpsertOutcome {
        id: row.id,
        created,
    })
}

pub async fn find_by_hm_id(pool: &PgPool, hm_id: &str) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as("SELECT * FROM profiles WHERE hm_id = $1")
        .bind(hm_id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive substring search on name or hm_id, newest first.
pub async fn list_profiles(
    pool: &PgPool,
    search: &str,
    page: Page,
) -> sqlx::Result<(Vec<ProfileRow>, i64)> {
    let pattern = format!("%{}%", escape_like(search.trim()));

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM profiles WHERE name ILIKE $1 OR hm_id ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT * FROM profiles
        WHERE name ILIKE $1 OR hm_id ILIKE $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&pattern)
    .bind(page.per_page)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, total))
}

/// Returns `false` when no profile had that id.
pub async fn delete_profile(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!("Deleted profile {id}");
    }
    Ok(result.rows_affected() > 0)
}

/// Applies an approval decision. `None` when the profile doesn't exist.
pub async fn set_approval(
    pool: &PgPool,
    id: i32,
    approved: bool,
) -> sqlx::Result<Option<ApprovalChange>> {
    let mut tx = pool.begin().await?;

    let current: Option<ProfileRow> =
        sqlx::query_as("SELECT * FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(current) = current else {
        return Ok(None);
    };

    let change = transition(
        ApprovalState::from_flag(current.approved),
        current.approved_at,
        ApprovalState::from_flag(approved),
        Utc::now(),
    );

    sqlx::query("UPDATE profiles SET approved = $2, approved_at = $3 WHERE id = $1")
        .bind(id)
        .bind(change.state.is_approved())
        .bind(change.approved_at)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Profile {} approval set to {:?}", current.hm_id, change.state);
    Ok(Some(change))
}

pub async fn profile_stats(pool: &PgPool) -> sqlx::Result<ProfileStats> {
    let total_profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;

    let by_role = group_counts(pool, "primary_role").await?;
    let by_competency = group_counts(pool, "competency").await?;

    Ok(ProfileStats {
        total_profiles,
        by_role,
        by_competency,
    })
}

/// Counts per distinct value of a whitelisted column, skipping null and blank keys.
async fn group_counts(pool: &PgPool, column: &'static str) -> sqlx::Result<BTreeMap<String, i64>> {
    let sql = format!(
        "SELECT {column}, COUNT(*) FROM profiles \
         WHERE {column} IS NOT NULL AND {column} <> '' GROUP BY {column}"
    );
    let rows: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

/// Every profile in insertion order, as one snapshot for export.
pub async fn fetch_all_for_export(pool: &PgPool) -> sqlx::Result<Vec<ProfileRow>> {
    sqlx::query_as("SELECT * FROM profiles ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

/// Escapes `%`, `_` and `\` so user input matches literally inside an ILIKE pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamps() {
        assert_eq!(Page::new(None, None), Page { page: 1, per_page: 20 });
        assert_eq!(Page::new(Some(0), Some(0)), Page { page: 1, per_page: 1 });
        assert_eq!(Page::new(Some(-3), Some(5000)), Page { page: 1, per_page: 100 });
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::new(Some(1), Some(20)).offset(), 0);
        assert_eq!(Page::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_page_count() {
        let page = Page::new(None, Some(20));
        assert_eq!(page.page_count(0), 0);
        assert_eq!(page.page_count(1), 1);
        assert_eq!(page.page_count(20), 1);
        assert_eq!(page.page_count(21), 2);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("HM_1"), "HM\\_1");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Asha"), "Asha");
    }
}
