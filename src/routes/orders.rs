use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, DispatchRequest, OrderList, OrderWithLines},
    error::AppResult,
    middleware::auth::AuthUser,
    models::InventoryOrder,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/approve", post(approve_order))
        .route("/{id}/pack", post(pack_order))
        .route("/{id}/dispatch", post(dispatch_order))
        .route("/{id}/deliver", post(deliver_order))
        .route("/{id}/cancel", post(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Pending order created from the cart", body = ApiResponse<InventoryOrder>),
        (status = 400, description = "Empty cart or insufficient stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::checkout(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc, default desc")
    ),
    responses((status = 200, description = "Orders visible to the caller", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let response = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/orders/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let response = order_service::get_order(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/orders/{id}/approve", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Orders")]
pub async fn approve_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::approve_order(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/orders/{id}/pack", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Orders")]
pub async fn pack_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::pack_order(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/dispatch",
    params(("id" = Uuid, Path)),
    request_body = DispatchRequest,
    responses(
        (status = 200, description = "Order dispatched", body = ApiResponse<InventoryOrder>),
        (status = 409, description = "Order is not packed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn dispatch_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DispatchRequest>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::dispatch_order(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/orders/{id}/deliver", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Orders")]
pub async fn deliver_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::deliver_order(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/orders/{id}/cancel", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Orders")]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryOrder>>> {
    let response = order_service::cancel_order(&state, &user, id).await?;
    Ok(Json(response))
}
