use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::leads::{AssignAgentRequest, ConvertLeadRequest, CreateLeadRequest, LeadList, QuoteLeadRequest},
    entity::{
        insurance_leads::{
            ActiveModel as LeadActive, Column as LeadCol, Entity as InsuranceLeads,
            Model as LeadModel,
        },
        users::Entity as Users,
        vehicles::{Column as VehicleCol, Entity as Vehicles},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_role},
    models::{InsuranceLead, Priority, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{LeadListQuery, SortOrder},
    state::AppState,
    workflow::{LeadStatus, ensure_transition},
};

pub async fn create_lead(
    state: &AppState,
    user: &AuthUser,
    payload: CreateLeadRequest,
) -> AppResult<ApiResponse<InsuranceLead>> {
    ensure_role(user, UserRole::VehicleOwner)?;

    let owned = Vehicles::find_by_id(payload.vehicle_id)
        .filter(VehicleCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if owned.is_none() {
        return Err(AppError::BadRequest("vehicle not found".into()));
    }

    let lead = LeadActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        vehicle_id: Set(payload.vehicle_id),
        insurance_agent_id: NotSet,
        lead_type: Set(payload.lead_type),
        current_policy: Set(payload.current_policy),
        coverage_required: Set(payload.coverage_required),
        budget_range: Set(payload.budget_range),
        status: Set(LeadStatus::New),
        quotes_provided: Set(serde_json::json!([])),
        converted_policy: NotSet,
        priority: Set(Priority::Medium),
        notes: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "lead_created",
        Some("insurance_leads"),
        Some(serde_json::json!({ "lead_id": lead.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Lead created", lead_from_entity(lead), None))
}

pub async fn list_leads(
    state: &AppState,
    user: &AuthUser,
    query: LeadListQuery,
) -> AppResult<ApiResponse<LeadList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    match user.role {
        UserRole::Admin => {}
        UserRole::VehicleOwner => {
            condition = condition.add(LeadCol::CustomerId.eq(user.user_id));
        }
        UserRole::InsuranceAgent => {
            condition = condition.add(LeadCol::InsuranceAgentId.eq(user.user_id));
        }
        _ => return Err(AppError::Forbidden),
    }
    if let Some(status) = query.status {
        condition = condition.add(LeadCol::Status.eq(status));
    }

    let mut finder = InsuranceLeads::find().filter(condition);
    finder = match query.sort_order {
        Some(SortOrder::Asc) => finder.order_by_asc(LeadCol::CreatedAt),
        _ => finder.order_by_desc(LeadCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .offset(offset as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(lead_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        LeadList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_lead(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InsuranceLead>> {
    let lead = InsuranceLeads::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_visible(user, &lead)?;
    Ok(ApiResponse::success("OK", lead_from_entity(lead), None))
}

/// Assignment is the first contact: the lead moves to `contacted` in the
/// same write that pins the agent.
pub async fn assign_agent(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AssignAgentRequest,
) -> AppResult<ApiResponse<InsuranceLead>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let lead = lock_lead(&txn, id).await?;
    ensure_transition(lead.status, LeadStatus::Contacted)?;

    let agent = Users::find_by_id(payload.insurance_agent_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("insurance agent not found".into()))?;
    if agent.user_type != UserRole::InsuranceAgent {
        return Err(AppError::BadRequest("assignee is not an insurance agent".into()));
    }

    let mut active: LeadActive = lead.into();
    active.insurance_agent_id = Set(Some(payload.insurance_agent_id));
    if let Some(priority) = payload.priority {
        active.priority = Set(priority);
    }
    active.notes = Set(payload.notes);
    active.status = Set(LeadStatus::Contacted);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, LeadStatus::Contacted).await;

    Ok(ApiResponse::success("Agent assigned", lead_from_entity(updated), None))
}

/// Append a quote; the first one moves the lead to `quoted`.
pub async fn quote_lead(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: QuoteLeadRequest,
) -> AppResult<ApiResponse<InsuranceLead>> {
    ensure_role(user, UserRole::InsuranceAgent)?;

    let txn = state.orm.begin().await?;
    let lead = lock_lead(&txn, id).await?;
    if lead.insurance_agent_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    if lead.status != LeadStatus::Quoted {
        ensure_transition(lead.status, LeadStatus::Quoted)?;
    }

    let mut quotes = match &lead.quotes_provided {
        serde_json::Value::Array(existing) => existing.clone(),
        _ => Vec::new(),
    };
    quotes.push(payload.quote);

    let mut active: LeadActive = lead.into();
    active.quotes_provided = Set(serde_json::Value::Array(quotes));
    active.status = Set(LeadStatus::Quoted);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, LeadStatus::Quoted).await;

    Ok(ApiResponse::success("Quote recorded", lead_from_entity(updated), None))
}

pub async fn convert_lead(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ConvertLeadRequest,
) -> AppResult<ApiResponse<InsuranceLead>> {
    ensure_role(user, UserRole::InsuranceAgent)?;

    let txn = state.orm.begin().await?;
    let lead = lock_lead(&txn, id).await?;
    if lead.insurance_agent_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(lead.status, LeadStatus::Converted)?;

    let mut active: LeadActive = lead.into();
    active.converted_policy = Set(Some(payload.converted_policy));
    active.status = Set(LeadStatus::Converted);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, LeadStatus::Converted).await;

    Ok(ApiResponse::success("Lead converted", lead_from_entity(updated), None))
}

pub async fn lose_lead(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InsuranceLead>> {
    let txn = state.orm.begin().await?;
    let lead = lock_lead(&txn, id).await?;

    let own = lead.insurance_agent_id == Some(user.user_id)
        && user.role == UserRole::InsuranceAgent;
    if !(own || user.role == UserRole::Admin) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(lead.status, LeadStatus::Lost)?;

    let mut active: LeadActive = lead.into();
    active.status = Set(LeadStatus::Lost);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, LeadStatus::Lost).await;

    Ok(ApiResponse::success("Lead closed", lead_from_entity(updated), None))
}

async fn lock_lead(txn: &DatabaseTransaction, id: Uuid) -> AppResult<LeadModel> {
    InsuranceLeads::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

fn ensure_visible(user: &AuthUser, lead: &LeadModel) -> AppResult<()> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::VehicleOwner if lead.customer_id == user.user_id => Ok(()),
        UserRole::InsuranceAgent if lead.insurance_agent_id == Some(user.user_id) => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

async fn audit_status(state: &AppState, user: &AuthUser, id: Uuid, status: LeadStatus) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "lead_status_changed",
        Some("insurance_leads"),
        Some(serde_json::json!({ "lead_id": id, "status": status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}

pub fn lead_from_entity(model: LeadModel) -> InsuranceLead {
    InsuranceLead {
        id: model.id,
        customer_id: model.customer_id,
        vehicle_id: model.vehicle_id,
        insurance_agent_id: model.insurance_agent_id,
        lead_type: model.lead_type,
        current_policy: model.current_policy,
        coverage_required: model.coverage_required,
        budget_range: model.budget_range,
        status: model.status,
        quotes_provided: model.quotes_provided,
        converted_policy: model.converted_policy,
        priority: model.priority,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
