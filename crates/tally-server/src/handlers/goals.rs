//! Goal handlers
//!
//! Goal responses carry the derived progress fields computed at request time.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::analytics::parse_param;
use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use tally_core::goals::{overdue_goals, prioritized_goals, summarize_by_status};
use tally_core::models::{
    AutoSaveSweep, ContributionSource, Goal, GoalStatus, GoalStatusSummary, GoalUpdate,
    GoalWithProgress, NewGoal,
};

#[derive(Debug, Deserialize)]
pub struct GoalListQuery {
    pub status: Option<String>,
}

/// GET /api/goals - List goals, optionally by status
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<GoalListQuery>,
) -> Result<Json<Vec<GoalWithProgress>>, AppError> {
    let status = parse_param::<GoalStatus>(params.status.as_deref())?;
    let now = Utc::now();
    let goals = state.db.list_goals(user.id, status)?;
    Ok(Json(goals.into_iter().map(|g| g.with_progress(now)).collect()))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewGoal>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let now = Utc::now();
    let goal = state.db.create_goal(user.id, body, now)?;
    Ok(Json(goal.with_progress(now)))
}

/// GET /api/goals/summary - Counts and sums per status
pub async fn goals_summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<GoalStatusSummary>>, AppError> {
    let goals = state.db.list_goals(user.id, None)?;
    Ok(Json(summarize_by_status(&goals)))
}

/// GET /api/goals/overdue - Active goals past their target date
pub async fn goals_overdue(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = state.db.list_goals(user.id, Some(GoalStatus::Active))?;
    Ok(Json(
        overdue_goals(&goals, Utc::now()).into_iter().cloned().collect(),
    ))
}

/// GET /api/goals/prioritized - Active goals by priority, then target date
pub async fn goals_prioritized(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = state.db.list_goals(user.id, Some(GoalStatus::Active))?;
    Ok(Json(prioritized_goals(&goals).into_iter().cloned().collect()))
}

/// GET /api/goals/:id - Get one goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let goal = state.db.get_goal(user.id, id)?;
    Ok(Json(goal.with_progress(Utc::now())))
}

/// PATCH /api/goals/:id - Edit goal fields
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<GoalUpdate>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let now = Utc::now();
    let goal = state.db.update_goal(user.id, id, body, now)?;
    Ok(Json(goal.with_progress(now)))
}

/// DELETE /api/goals/:id - Delete a goal with its history
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_goal(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source: ContributionSource,
}

/// POST /api/goals/:id/contributions - Add money to a goal
pub async fn add_goal_contribution(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<ContributionRequest>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let now = Utc::now();
    let goal = state
        .db
        .add_goal_contribution(user.id, id, body.amount, body.note, body.source, now)?;
    Ok(Json(goal.with_progress(now)))
}

#[derive(Serialize)]
pub struct AutoSaveResponse {
    pub amount: f64,
    pub goal: GoalWithProgress,
}

/// POST /api/goals/:id/auto-save - Run a goal's auto-save if due
pub async fn run_goal_auto_save(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AutoSaveResponse>, AppError> {
    let now = Utc::now();
    let (goal, amount) = state.db.run_goal_auto_save(user.id, id, now)?;
    Ok(Json(AutoSaveResponse {
        amount,
        goal: goal.with_progress(now),
    }))
}

/// POST /api/goals/auto-save/run - Apply every due auto-save
pub async fn run_due_auto_saves(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AutoSaveSweep>, AppError> {
    let sweep = state.db.run_due_auto_saves(user.id, Utc::now())?;
    info!(
        user_id = user.id,
        applied = sweep.applied.len(),
        "Auto-save sweep requested via API"
    );
    Ok(Json(sweep))
}
