//! Export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
};
use serde::Deserialize;
use tracing::info;

use super::analytics::parse_param;
use crate::{AppError, AppState, CurrentUser};
use tally_core::models::ExpenseCategory;
use tally_core::period::parse_date;
use tally_core::ExpenseExportOptions;

/// Query parameters for expense export
#[derive(Debug, Deserialize)]
pub struct ExpenseExportQuery {
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
    pub category: Option<String>,
}

/// GET /api/export/expenses - Export expenses as CSV
pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ExpenseExportQuery>,
) -> Result<Response<Body>, AppError> {
    let opts = ExpenseExportOptions {
        from: params.from.as_deref().map(parse_date).transpose()?,
        to: params.to.as_deref().map(parse_date).transpose()?,
        category: parse_param::<ExpenseCategory>(params.category.as_deref())?,
    };

    let csv = state.db.export_expenses_csv(user.id, &opts)?;
    let lines = csv.lines().count().saturating_sub(1);
    info!(user_id = user.id, "Exported {} expenses to CSV", lines);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"expenses.csv\"",
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}
