//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::analytics::{parse_param, resolve_range};
use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::models::{Expense, ExpenseCategory, NewExpense, PaymentMethod};
use tally_core::{suggest_category, CategorySuggestion, ExpenseFilter, SortField, SortOrder};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    /// Search query (matches description or notes)
    pub search: Option<String>,
    /// Period preset (week, month, year)
    pub period: Option<String>,
    /// Custom start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    pub to: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    /// Sort field (date or amount)
    pub sort: Option<String>,
    /// Sort direction (asc or desc)
    pub order: Option<String>,
}

pub(crate) fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/expenses - List expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    // Only filter by date when a period or a custom bound was given
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

    let filter = ExpenseFilter::new()
        .category(parse_param::<ExpenseCategory>(params.category.as_deref())?)
        .payment_method(parse_param::<PaymentMethod>(params.payment_method.as_deref())?)
        .search(params.search.as_deref())
        .date_range(date_range)
        .recurring_only(params.recurring)
        .sort(
            parse_param::<SortField>(params.sort.as_deref())?.unwrap_or_default(),
            parse_param::<SortOrder>(params.order.as_deref())?.unwrap_or_default(),
        );

    let expenses = state.db.list_expenses(user.id, &filter, limit, offset)?;
    let total = state.db.count_expenses(user.id, &filter)?;

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewExpense>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.db.create_expense(user.id, &body)?;
    Ok(Json(expense))
}

/// GET /api/expenses/:id - Get one expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    Ok(Json(state.db.get_expense(user.id, id)?))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_expense(user.id, id)?;
    info!(user_id = user.id, expense_id = id, "Deleted expense via API");
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub description: String,
}

/// POST /api/expenses/suggest-category - Suggest a category for a description
pub async fn suggest_expense_category(
    CurrentUser(_user): CurrentUser,
    Json(body): Json<SuggestRequest>,
) -> Result<Json<CategorySuggestion>, AppError> {
    if body.description.trim().is_empty() {
        return Err(AppError::bad_request("Description is required"));
    }
    Ok(Json(suggest_category(&body.description)?))
}
