use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::skills::catalog::{SkillCatalog, SkillCatalogEntry};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SkillSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub group: String,
}

/// Owned search results, ready to serialize.
pub fn search_catalog(catalog: &SkillCatalog, query: &str, group: &str) -> Vec<SkillCatalogEntry> {
    catalog.search(query, group).into_iter().cloned().collect()
}

/// GET /api/skills
pub async fn handle_search_skills(
    State(state): State<AppState>,
    Query(params): Query<SkillSearchQuery>,
) -> Json<Vec<SkillCatalogEntry>> {
    Json(search_catalog(&state.catalog, &params.q, &params.group))
}
