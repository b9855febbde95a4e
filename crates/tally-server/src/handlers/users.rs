//! User profile handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, CurrentUser};
use tally_core::models::{NewUser, User};

/// POST /api/users - Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    let user = state.db.create_user(&body)?;
    info!(user_id = user.id, "Created user via API");
    Ok(Json(user))
}

/// GET /api/me - The user named by X-Tally-User
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub monthly_budget: f64,
}

/// PUT /api/me/budget - Set the monthly budget
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<BudgetRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.db.set_monthly_budget(user.id, body.monthly_budget)?;
    info!(user_id = user.id, budget = user.monthly_budget, "Updated monthly budget");
    Ok(Json(user))
}
