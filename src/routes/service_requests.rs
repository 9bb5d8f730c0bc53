use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::services::{
        AssignProviderRequest, CompleteServiceRequest, CreateServiceRequest, RateServiceRequest,
        ServiceRequestList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ServiceRequest,
    response::ApiResponse,
    routes::params::ServiceListQuery,
    services::service_request_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/{id}", get(get_request))
        .route("/{id}/assign", post(assign_provider))
        .route("/{id}/start", post(start_work))
        .route("/{id}/complete", post(complete_work))
        .route("/{id}/cancel", post(cancel_request))
        .route("/{id}/rate", post(rate_request))
}

#[utoipa::path(
    post,
    path = "/api/service-requests",
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Request created", body = ApiResponse<ServiceRequest>),
        (status = 400, description = "Vehicle not found or invalid payload"),
    ),
    security(("bearer_auth" = [])),
    tag = "ServiceRequests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::create_request(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/service-requests",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc, default desc")
    ),
    responses((status = 200, description = "Requests visible to the caller", body = ApiResponse<ServiceRequestList>)),
    security(("bearer_auth" = [])),
    tag = "ServiceRequests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ServiceListQuery>,
) -> AppResult<Json<ApiResponse<ServiceRequestList>>> {
    let response = service_request_service::list_requests(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/service-requests/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "ServiceRequests")]
pub async fn get_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::get_request(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/service-requests/{id}/assign",
    params(("id" = Uuid, Path)),
    request_body = AssignProviderRequest,
    responses(
        (status = 200, description = "Provider assigned", body = ApiResponse<ServiceRequest>),
        (status = 409, description = "Request is not awaiting assignment"),
    ),
    security(("bearer_auth" = [])),
    tag = "ServiceRequests"
)]
pub async fn assign_provider(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignProviderRequest>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::assign_provider(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/service-requests/{id}/start", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "ServiceRequests")]
pub async fn start_work(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::start_work(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/service-requests/{id}/complete",
    params(("id" = Uuid, Path)),
    request_body = CompleteServiceRequest,
    responses(
        (status = 200, description = "Service completed", body = ApiResponse<ServiceRequest>),
        (status = 409, description = "Request is not in progress"),
    ),
    security(("bearer_auth" = [])),
    tag = "ServiceRequests"
)]
pub async fn complete_work(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteServiceRequest>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::complete_work(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/service-requests/{id}/cancel", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "ServiceRequests")]
pub async fn cancel_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::cancel_request(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/service-requests/{id}/rate", params(("id" = Uuid, Path)), request_body = RateServiceRequest, security(("bearer_auth" = [])), tag = "ServiceRequests")]
pub async fn rate_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateServiceRequest>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let response = service_request_service::rate_request(&state, &user, id, payload).await?;
    Ok(Json(response))
}
