//! Income handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::analytics::{parse_param, resolve_range};
use super::expenses::default_limit;
use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::models::{Income, IncomeSource, NewIncome};
use tally_core::{IncomeFilter, SortField, SortOrder};

#[derive(Debug, Deserialize)]
pub struct IncomeQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub source: Option<String>,
    pub period: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Serialize)]
pub struct IncomeListResponse {
    pub incomes: Vec<Income>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/incomes - List incomes
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<IncomeQuery>,
) -> Result<Json<IncomeListResponse>, AppError> {
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let date_range = if params.period.is_some() || params.from.is_some() || params.to.is_some() {
        let range = resolve_range(
            params.period.as_deref(),
            params.from.as_deref(),
            params.to.as_deref(),
            Utc::now(),
        )?;
        Some((range.start, range.end))
    } else {
        None
    };

    let filter = IncomeFilter::new()
        .source(parse_param::<IncomeSource>(params.source.as_deref())?)
        .date_range(date_range)
        .recurring_only(params.recurring)
        .sort(
            parse_param::<SortField>(params.sort.as_deref())?.unwrap_or_default(),
            parse_param::<SortOrder>(params.order.as_deref())?.unwrap_or_default(),
        );

    let incomes = state.db.list_incomes(user.id, &filter, limit, offset)?;
    let total = state.db.count_incomes(user.id, &filter)?;

    Ok(Json(IncomeListResponse {
        incomes,
        total,
        limit,
        offset,
    }))
}

/// POST /api/incomes - Record an income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewIncome>,
) -> Result<Json<Income>, AppError> {
    Ok(Json(state.db.create_income(user.id, &body)?))
}

/// GET /api/incomes/:id - Get one income
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Income>, AppError> {
    Ok(Json(state.db.get_income(user.id, id)?))
}

/// DELETE /api/incomes/:id - Delete an income
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_income(user.id, id)?;
    info!(user_id = user.id, income_id = id, "Deleted income via API");
    Ok(Json(SuccessResponse { success: true }))
}
