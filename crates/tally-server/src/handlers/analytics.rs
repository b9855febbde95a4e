//! Analytics handlers
//!
//! Windowed reports take `period` (week, month, year; anything else falls
//! back to month) or an explicit `from`/`to` pair, which wins when both are
//! present.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser};
use tally_core::analytics::{
    self, suggest_category_budgets, BudgetProjection, CategoryBudget, HealthScore, PeriodSummary,
    DEFAULT_TREND_MONTHS,
};
use tally_core::models::{AmountStats, EntryKind, GroupTotal, MonthBucket, WeekdayBucket};
use tally_core::{DateRange, Period};

/// Longest trend window a request may ask for
const MAX_TREND_MONTHS: u32 = 60;

/// Window selection shared by the analytics and listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    /// Period preset (week, month, year)
    pub period: Option<String>,
    /// Custom start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    pub to: Option<String>,
    /// expense or income
    pub kind: Option<String>,
}

/// Resolve a window from a period token or a custom date pair
pub fn resolve_range(
    period: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateRange, AppError> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(DateRange::parse(from, to)?),
        (None, None) => Ok(Period::parse_or_default(period).windows(now).current),
        _ => Err(AppError::bad_request("from and to must be given together")),
    }
}

/// Parse an optional enum-valued query parameter
pub(crate) fn parse_param<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = String>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>().map_err(|e| AppError::bad_request(&e)))
        .transpose()
}

fn entry_kind(value: Option<&str>) -> Result<EntryKind, AppError> {
    Ok(parse_param(value)?.unwrap_or(EntryKind::Expense))
}

impl WindowQuery {
    fn range(&self, now: DateTime<Utc>) -> Result<DateRange, AppError> {
        resolve_range(
            self.period.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
            now,
        )
    }
}

/// GET /api/analytics/summary - Period totals against the previous period
pub async fn analytics_summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<WindowQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let period = Period::parse_or_default(params.period.as_deref());
    let summary = analytics::period_summary(&state.db, user.id, period, Utc::now())?;
    Ok(Json(summary))
}

/// GET /api/analytics/categories - Category (or income source) breakdown
pub async fn analytics_categories(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<GroupTotal>>, AppError> {
    let kind = entry_kind(params.kind.as_deref())?;
    let range = params.range(Utc::now())?;
    Ok(Json(analytics::breakdown(&state.db, user.id, kind, range)?))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<u32>,
    pub kind: Option<String>,
}

/// GET /api/analytics/trends - Monthly totals over the trailing months
pub async fn analytics_trends(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<TrendQuery>,
) -> Result<Json<Vec<MonthBucket>>, AppError> {
    let kind = entry_kind(params.kind.as_deref())?;
    let months = params
        .months
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS);
    Ok(Json(analytics::monthly_trend(
        &state.db,
        user.id,
        kind,
        months,
        Utc::now(),
    )?))
}

/// GET /api/analytics/weekly-pattern - Spending by day of week
pub async fn analytics_weekly_pattern(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<WeekdayBucket>>, AppError> {
    let range = params.range(Utc::now())?;
    Ok(Json(analytics::weekday_pattern(&state.db, user.id, range)?))
}

/// GET /api/analytics/payment-methods - Spending by payment method
pub async fn analytics_payment_methods(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<GroupTotal>>, AppError> {
    let range = params.range(Utc::now())?;
    Ok(Json(analytics::payment_method_breakdown(
        &state.db, user.id, range,
    )?))
}

/// GET /api/analytics/transaction-sizes - Amount distribution per category
pub async fn analytics_transaction_sizes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<AmountStats>>, AppError> {
    let range = params.range(Utc::now())?;
    Ok(Json(analytics::transaction_sizes(&state.db, user.id, range)?))
}

/// GET /api/analytics/budget - This month's budget projection
pub async fn analytics_budget(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BudgetProjection>, AppError> {
    Ok(Json(state.db.budget_projection(user.id, Utc::now())?))
}

/// GET /api/analytics/budget/suggestions - Split the budget across categories
pub async fn analytics_budget_suggestions(
    CurrentUser(user): CurrentUser,
) -> Json<Vec<CategoryBudget>> {
    Json(suggest_category_budgets(user.monthly_budget))
}

/// GET /api/analytics/health - Financial health score
pub async fn analytics_health(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<HealthScore>, AppError> {
    Ok(Json(state.db.financial_health(user.id, Utc::now())?))
}
