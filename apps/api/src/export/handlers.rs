use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::info;

use crate::auth::AdminClaims;
use crate::errors::AppError;
use crate::export::assembler::{build_report, write_csv, write_xlsx, ReportRow};
use crate::profiles::models::Profile;
use crate::profiles::store::fetch_all_for_export;
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Fetches one snapshot of all profiles and flattens it.
async fn load_report(state: &AppState) -> Result<Vec<ReportRow>, AppError> {
    let profiles: Vec<Profile> = fetch_all_for_export(&state.db)
        .await?
        .into_iter()
        .map(|row| Profile::from_row(row, &state.catalog))
        .collect();
    Ok(build_report(&state.catalog, &profiles))
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(body),
    )
        .into_response()
}

/// GET /api/admin/export/csv
pub async fn handle_export_csv(
    admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let rows = load_report(&state).await?;
    let body = write_csv(&rows).map_err(|e| AppError::Export(e.to_string()))?;
    info!("{} exported {} profiles as CSV", admin.subject(), rows.len());
    Ok(attachment("text/csv; charset=utf-8", "profiles.csv", body))
}

/// GET /api/admin/export/excel
pub async fn handle_export_excel(
    admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let rows = load_report(&state).await?;
    let body = write_xlsx(&rows).map_err(|e| AppError::Export(e.to_string()))?;
    info!("{} exported {} profiles as XLSX", admin.subject(), rows.len());
    Ok(attachment(XLSX_CONTENT_TYPE, "profiles.xlsx", body))
}
