use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Vehicle,
    response::ApiResponse,
    routes::params::Pagination,
    services::vehicle_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/{id}",
            get(get_vehicle).patch(update_vehicle).delete(delete_vehicle),
        )
}

#[utoipa::path(get, path = "/api/vehicles", security(("bearer_auth" = [])), tag = "Vehicles")]
pub async fn list_vehicles(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<VehicleList>>> {
    let response = vehicle_service::list_vehicles(&state, &user, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle registered", body = ApiResponse<Vehicle>),
        (status = 400, description = "Registration number already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVehicleRequest>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let response = vehicle_service::create_vehicle(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/vehicles/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Vehicles")]
pub async fn get_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let response = vehicle_service::get_vehicle(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(patch, path = "/api/vehicles/{id}", params(("id" = Uuid, Path)), request_body = UpdateVehicleRequest, security(("bearer_auth" = [])), tag = "Vehicles")]
pub async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let response = vehicle_service::update_vehicle(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(delete, path = "/api/vehicles/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Vehicles")]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = vehicle_service::delete_vehicle(&state, &user, id).await?;
    Ok(Json(response))
}
