use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::inventory::{
        CreateInventoryItemRequest, InventoryList, StockAdjustRequest, UpdateInventoryItemRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::InventoryItem,
    response::ApiResponse,
    routes::params::{InventoryQuery, LowStockQuery},
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/low-stock", get(list_low_stock))
        .route("/{id}", get(get_item).patch(update_item))
        .route("/{id}/stock", post(adjust_stock))
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name, code or brand"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("include_inactive" = Option<bool>, Query, description = "Admin/warehouse only")
    ),
    responses((status = 200, description = "Parts catalogue", body = ApiResponse<InventoryList>)),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_items(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let response = inventory_service::list_items(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/inventory/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Inventory")]
pub async fn get_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let response = inventory_service::get_item(&state, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 200, description = "Item created", body = ApiResponse<InventoryItem>),
        (status = 400, description = "Duplicate item code or bad amounts"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let response = inventory_service::create_item(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(patch, path = "/api/inventory/{id}", params(("id" = Uuid, Path)), request_body = UpdateInventoryItemRequest, security(("bearer_auth" = [])), tag = "Inventory")]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let response = inventory_service::update_item(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/inventory/{id}/stock",
    params(("id" = Uuid, Path)),
    request_body = StockAdjustRequest,
    responses((status = 200, description = "Stock adjusted", body = ApiResponse<InventoryItem>)),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let response = inventory_service::adjust_stock(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/inventory/low-stock", security(("bearer_auth" = [])), tag = "Inventory")]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let response = inventory_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(response))
}
