use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analytics::view::{select, PairQuery, SortOrder, DEFAULT_PAGE_SIZE};
use crate::detection::{analyze, DetectionParams};
use crate::errors::AppError;
use crate::ingestion::TradeTable;
use crate::models::{AnalysisReport, Distributions, HedgePair, HedgeType, NotablePatterns, SummaryStats};
use crate::AppState;

/// Per-request overrides of the configured detection defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ParamOverrides {
    pub price_threshold: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub include_close_price: Option<bool>,
}

impl ParamOverrides {
    fn apply(&self, base: DetectionParams) -> DetectionParams {
        DetectionParams {
            price_threshold: self.price_threshold.unwrap_or(base.price_threshold),
            confidence_threshold: self.confidence_threshold.unwrap_or(base.confidence_threshold),
            include_close_price: self.include_close_price.unwrap_or(base.include_close_price),
            timestamp_zone: base.timestamp_zone,
        }
    }
}

/// Query-string selection over the returned pair list. Stats are always
/// computed over every pair.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    #[serde(rename = "type")]
    pub hedge_type: Option<String>,
    pub min_confidence: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ViewParams {
    fn to_query(&self) -> Result<PairQuery, AppError> {
        let hedge_type = match self.hedge_type.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                HedgeType::from_str(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("unknown hedge type '{raw}'")))?,
            ),
        };

        let sort = match self.sort.as_deref() {
            None => SortOrder::Id,
            Some(raw) => SortOrder::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort order '{raw}'")))?,
        };

        // Asking for a page implies pagination; otherwise return everything.
        let page_size = match (self.page, self.page_size) {
            (_, Some(size)) => Some(size),
            (Some(_), None) => Some(DEFAULT_PAGE_SIZE),
            (None, None) => None,
        };

        Ok(PairQuery {
            hedge_type,
            min_confidence: self.min_confidence.unwrap_or(0.0),
            sort,
            page: self.page.unwrap_or(1),
            page_size,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub hedge_pairs: Vec<HedgePair>,
    pub total_matching: usize,
    pub page: usize,
    pub total_pages: usize,
    pub summary_stats: SummaryStats,
    pub notable_patterns: NotablePatterns,
    pub distributions: Distributions,
}

impl AnalyzeResponse {
    fn build(report: AnalysisReport, query: &PairQuery) -> Self {
        let page = select(&report.hedge_pairs, query);
        Self {
            hedge_pairs: page.pairs,
            total_matching: page.total_matching,
            page: page.page,
            total_pages: page.total_pages,
            summary_stats: report.summary_stats,
            notable_patterns: report.notable_patterns,
            distributions: report.distributions,
        }
    }
}

fn parse_form_number(name: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be a number, got '{raw}'")))
}

/// Run the detection on the blocking pool; it is CPU-bound and quadratic per
/// instrument group.
async fn run_analysis<F>(build_table: F, params: DetectionParams) -> Result<AnalysisReport, AppError>
where
    F: FnOnce() -> Result<TradeTable, crate::errors::DetectError> + Send + 'static,
{
    let report = tokio::task::spawn_blocking(move || {
        let table = build_table()?;
        analyze(&table, &params)
    })
    .await
    .map_err(|e| anyhow::anyhow!("analysis task failed: {e}"))??;

    Ok(report)
}

/// POST /api/analyze: multipart CSV upload.
pub async fn analyze_upload(
    State(state): State<AppState>,
    Query(view): Query<ViewParams>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let query = view.to_query()?;
    let mut overrides = ParamOverrides::default();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes.to_vec()));
            }
            "price_threshold" => {
                overrides.price_threshold = Some(parse_form_number(&name, &field.text().await?)?);
            }
            "confidence_threshold" => {
                overrides.confidence_threshold =
                    Some(parse_form_number(&name, &field.text().await?)?);
            }
            "include_close_price" => {
                overrides.include_close_price =
                    Some(field.text().await?.trim().eq_ignore_ascii_case("true"));
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| AppError::BadRequest("No file part".into()))?;
    if file_name.is_empty() {
        return Err(AppError::BadRequest("No selected file".into()));
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(AppError::BadRequest("File must be a CSV".into()));
    }

    let params = overrides.apply(state.config.default_params());
    tracing::info!(
        file = %file_name,
        bytes = bytes.len(),
        price_threshold = params.price_threshold,
        confidence_threshold = params.confidence_threshold,
        include_close_price = params.include_close_price,
        "Analyzing uploaded trade file"
    );

    let report = run_analysis(move || TradeTable::from_csv_reader(bytes.as_slice()), params).await?;
    Ok(Json(AnalyzeResponse::build(report, &query)))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJsonRequest {
    pub rows: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub params: ParamOverrides,
}

/// POST /api/analyze/json: rows already decoded by the caller.
pub async fn analyze_json(
    State(state): State<AppState>,
    Query(view): Query<ViewParams>,
    Json(body): Json<AnalyzeJsonRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let query = view.to_query()?;
    let params = body.params.apply(state.config.default_params());
    let rows = body.rows;

    tracing::info!(rows = rows.len(), "Analyzing JSON trade rows");

    let report = run_analysis(move || Ok(TradeTable::from_json_rows(rows)), params).await?;
    Ok(Json(AnalyzeResponse::build(report, &query)))
}
