use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        CommissionList, CreatePaymentRequest, PaymentList, SettleCommissionsRequest,
        SettlementResult, TransactionFeed,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    routes::params::{Pagination, PaymentListQuery},
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/transactions", get(transaction_feed))
        .route("/{id}/collect", post(collect_payment))
        .route("/{id}/fail", post(fail_payment))
}

pub fn commissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_commissions))
        .route("/settle", post(settle_commissions))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses((status = 200, description = "Pending payment created", body = ApiResponse<Payment>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let response = payment_service::create_payment(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by payment status")
    ),
    responses((status = 200, description = "Payments visible to the caller", body = ApiResponse<PaymentList>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let response = payment_service::list_payments(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/payments/{id}/collect", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Payments")]
pub async fn collect_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let response = payment_service::collect_payment(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/payments/{id}/fail", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "Payments")]
pub async fn fail_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let response = payment_service::fail_payment(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/payments/transactions",
    responses((status = 200, description = "Payments and commissions, newest first", body = ApiResponse<TransactionFeed>)),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn transaction_feed(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TransactionFeed>>> {
    let response = payment_service::transaction_feed(&state, &user, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/commissions", security(("bearer_auth" = [])), tag = "Commissions")]
pub async fn list_commissions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CommissionList>>> {
    let response = payment_service::list_commissions(&state, &user, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/commissions/settle",
    request_body = SettleCommissionsRequest,
    responses(
        (status = 200, description = "Batch settled", body = ApiResponse<SettlementResult>),
        (status = 409, description = "A commission in the batch is already settled"),
    ),
    security(("bearer_auth" = [])),
    tag = "Commissions"
)]
pub async fn settle_commissions(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SettleCommissionsRequest>,
) -> AppResult<Json<ApiResponse<SettlementResult>>> {
    let response = payment_service::settle_commissions(&state, &user, payload).await?;
    Ok(Json(response))
}
