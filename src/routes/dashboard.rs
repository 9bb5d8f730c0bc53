use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardData,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Stats and recent activity for the caller's role", body = ApiResponse<DashboardData>),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardData>>> {
    let response = dashboard_service::dashboard(&state, &user).await?;
    Ok(Json(response))
}
