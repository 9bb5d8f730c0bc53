use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::users::{AdminUpdateUserRequest, UpdateProfileRequest, UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    routes::params::UserListQuery,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(me).patch(update_me))
        .route("/{id}", patch(admin_update_user))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Current user", body = ApiResponse<User>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let response = user_service::me(&state, &user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile updated", body = ApiResponse<User>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let response = user_service::update_me(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("role" = Option<String>, Query, description = "Filter by user role")
    ),
    responses((status = 200, description = "All users", body = ApiResponse<UserList>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let response = user_service::list_users(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses((status = 200, description = "User updated", body = ApiResponse<User>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn admin_update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let response = user_service::admin_update_user(&state, &user, id, payload).await?;
    Ok(Json(response))
}
