use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::leads::{
        AssignAgentRequest, ConvertLeadRequest, CreateLeadRequest, LeadList, QuoteLeadRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::InsuranceLead,
    response::ApiResponse,
    routes::params::LeadListQuery,
    services::lead_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route("/{id}", get(get_lead))
        .route("/{id}/assign", post(assign_agent))
        .route("/{id}/quote", post(quote_lead))
        .route("/{id}/convert", post(convert_lead))
        .route("/{id}/lose", post(lose_lead))
}

#[utoipa::path(
    post,
    path = "/api/insurance-leads",
    request_body = CreateLeadRequest,
    responses((status = 200, description = "Lead created", body = ApiResponse<InsuranceLead>)),
    security(("bearer_auth" = [])),
    tag = "InsuranceLeads"
)]
pub async fn create_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLeadRequest>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::create_lead(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/insurance-leads", security(("bearer_auth" = [])), tag = "InsuranceLeads")]
pub async fn list_leads(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LeadListQuery>,
) -> AppResult<Json<ApiResponse<LeadList>>> {
    let response = lead_service::list_leads(&state, &user, query).await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/api/insurance-leads/{id}", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "InsuranceLeads")]
pub async fn get_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::get_lead(&state, &user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/insurance-leads/{id}/assign",
    params(("id" = Uuid, Path)),
    request_body = AssignAgentRequest,
    responses(
        (status = 200, description = "Agent assigned; lead moves to contacted", body = ApiResponse<InsuranceLead>),
        (status = 409, description = "Lead already worked"),
    ),
    security(("bearer_auth" = [])),
    tag = "InsuranceLeads"
)]
pub async fn assign_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignAgentRequest>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::assign_agent(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/insurance-leads/{id}/quote", params(("id" = Uuid, Path)), request_body = QuoteLeadRequest, security(("bearer_auth" = [])), tag = "InsuranceLeads")]
pub async fn quote_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuoteLeadRequest>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::quote_lead(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/insurance-leads/{id}/convert", params(("id" = Uuid, Path)), request_body = ConvertLeadRequest, security(("bearer_auth" = [])), tag = "InsuranceLeads")]
pub async fn convert_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertLeadRequest>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::convert_lead(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(post, path = "/api/insurance-leads/{id}/lose", params(("id" = Uuid, Path)), security(("bearer_auth" = [])), tag = "InsuranceLeads")]
pub async fn lose_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InsuranceLead>>> {
    let response = lead_service::lose_lead(&state, &user, id).await?;
    Ok(Json(response))
}
