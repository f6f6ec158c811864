use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;

use crate::analytics::export::pairs_to_csv;
use crate::errors::AppError;
use crate::models::HedgePair;

const EXPORT_FILE_NAME: &str = "hedge_pairs_export.csv";

/// POST /api/export/csv: render a pair list (as returned by the analyze
/// endpoints) into a downloadable CSV file.
pub async fn export_csv(Json(pairs): Json<Vec<HedgePair>>) -> Result<impl IntoResponse, AppError> {
    if pairs.is_empty() {
        return Err(AppError::BadRequest("No data to export".into()));
    }

    let body = pairs_to_csv(&pairs)?;
    tracing::info!(pairs = pairs.len(), bytes = body.len(), "Exported hedge pairs");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
