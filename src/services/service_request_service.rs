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
    commission,
    dto::services::{
        AssignProviderRequest, CompleteServiceRequest, CreateServiceRequest, RateServiceRequest,
        ServiceRequestList,
    },
    entity::{
        commissions::ActiveModel as CommissionActive,
        service_requests::{
            ActiveModel as RequestActive, Column as RequestCol, Entity as ServiceRequests,
            Model as RequestModel,
        },
        users::Entity as Users,
        vehicles::{Column as VehicleCol, Entity as Vehicles},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_role},
    models::{Priority, ServiceRequest, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{ServiceListQuery, SortOrder},
    state::AppState,
    workflow::{CommissionStatus, ServiceStatus, ensure_transition},
};

pub async fn create_request(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_role(user, UserRole::VehicleOwner)?;

    // Requests can only be raised against the caller's own vehicle.
    let owned = Vehicles::find_by_id(payload.vehicle_id)
        .filter(VehicleCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if owned.is_none() {
        return Err(AppError::BadRequest("vehicle not found".into()));
    }
    if payload.service_type.trim().is_empty() {
        return Err(AppError::BadRequest("service_type must not be empty".into()));
    }

    let request = RequestActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        vehicle_id: Set(payload.vehicle_id),
        service_provider_id: NotSet,
        service_type: Set(payload.service_type),
        description: Set(payload.description),
        priority: Set(payload.priority.unwrap_or(Priority::Medium)),
        status: Set(ServiceStatus::Requested),
        scheduled_date: Set(payload.scheduled_date.map(Into::into)),
        location: Set(payload.location),
        estimated_cost: NotSet,
        actual_cost: NotSet,
        commission_amount: NotSet,
        rating: NotSet,
        feedback: NotSet,
        notes: NotSet,
        completed_date: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "service_request_created",
        Some("service_requests"),
        Some(serde_json::json!({ "request_id": request.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Service request created",
        request_from_entity(request),
        None,
    ))
}

pub async fn list_requests(
    state: &AppState,
    user: &AuthUser,
    query: ServiceListQuery,
) -> AppResult<ApiResponse<ServiceRequestList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    match user.role {
        UserRole::Admin => {}
        UserRole::VehicleOwner => {
            condition = condition.add(RequestCol::CustomerId.eq(user.user_id));
        }
        UserRole::ServiceProvider => {
            condition = condition.add(RequestCol::ServiceProviderId.eq(user.user_id));
        }
        _ => return Err(AppError::Forbidden),
    }
    if let Some(status) = query.status {
        condition = condition.add(RequestCol::Status.eq(status));
    }

    let mut finder = ServiceRequests::find().filter(condition);
    finder = match query.sort_order {
        Some(SortOrder::Asc) => finder.order_by_asc(RequestCol::CreatedAt),
        _ => finder.order_by_desc(RequestCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .offset(offset as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(request_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ServiceRequestList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ServiceRequest>> {
    let request = ServiceRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_visible(user, &request)?;
    Ok(ApiResponse::success("OK", request_from_entity(request), None))
}

/// Admin pairs a request with a provider and an estimate.
pub async fn assign_provider(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AssignProviderRequest,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_admin(user)?;
    if payload.estimated_cost < 0 {
        return Err(AppError::BadRequest("estimated_cost must not be negative".into()));
    }

    let txn = state.orm.begin().await?;
    let request = lock_request(&txn, id).await?;
    ensure_transition(request.status, ServiceStatus::Assigned)?;

    let provider = Users::find_by_id(payload.service_provider_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("service provider not found".into()))?;
    if provider.user_type != UserRole::ServiceProvider {
        return Err(AppError::BadRequest("assignee is not a service provider".into()));
    }

    let mut active: RequestActive = request.into();
    active.service_provider_id = Set(Some(payload.service_provider_id));
    active.estimated_cost = Set(Some(payload.estimated_cost));
    active.notes = Set(payload.notes);
    active.status = Set(ServiceStatus::Assigned);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, ServiceStatus::Assigned).await;

    Ok(ApiResponse::success(
        "Provider assigned",
        request_from_entity(updated),
        None,
    ))
}

pub async fn start_work(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let txn = state.orm.begin().await?;
    let request = lock_request(&txn, id).await?;
    if request.service_provider_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(request.status, ServiceStatus::InProgress)?;

    let mut active: RequestActive = request.into();
    active.status = Set(ServiceStatus::InProgress);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, ServiceStatus::InProgress).await;

    Ok(ApiResponse::success(
        "Work started",
        request_from_entity(updated),
        None,
    ))
}

/// Completion fixes the final cost, stamps the date and books the platform's
/// commission at the provider's rate.
pub async fn complete_work(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CompleteServiceRequest,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let txn = state.orm.begin().await?;
    let request = lock_request(&txn, id).await?;
    if request.service_provider_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(request.status, ServiceStatus::Completed)?;

    let actual_cost = payload
        .actual_cost
        .or(request.estimated_cost)
        .unwrap_or(0);
    if actual_cost < 0 {
        return Err(AppError::BadRequest("actual_cost must not be negative".into()));
    }

    let provider = Users::find_by_id(user.user_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let commission_amount = commission::commission_for(actual_cost, provider.commission_rate_bps);

    let now = Utc::now();
    let mut active: RequestActive = request.into();
    active.status = Set(ServiceStatus::Completed);
    active.actual_cost = Set(Some(actual_cost));
    active.commission_amount = Set(Some(commission_amount));
    active.completed_date = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let updated = active.update(&txn).await?;

    CommissionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        transaction_type: Set("service_request".to_string()),
        transaction_id: Set(id),
        gross_amount: Set(actual_cost),
        commission_amount: Set(commission_amount),
        net_amount: Set(actual_cost - commission_amount),
        status: Set(CommissionStatus::Calculated),
        settlement_batch: NotSet,
        settlement_date: NotSet,
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    audit_status(state, user, id, ServiceStatus::Completed).await;

    Ok(ApiResponse::success(
        "Service completed",
        request_from_entity(updated),
        None,
    ))
}

pub async fn cancel_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ServiceRequest>> {
    let txn = state.orm.begin().await?;
    let request = lock_request(&txn, id).await?;

    let own = request.customer_id == user.user_id && user.role == UserRole::VehicleOwner;
    if !(own || user.role == UserRole::Admin) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(request.status, ServiceStatus::Cancelled)?;

    let mut active: RequestActive = request.into();
    active.status = Set(ServiceStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit_status(state, user, id, ServiceStatus::Cancelled).await;

    Ok(ApiResponse::success(
        "Request cancelled",
        request_from_entity(updated),
        None,
    ))
}

/// Customers rate completed work once.
pub async fn rate_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RateServiceRequest,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_role(user, UserRole::VehicleOwner)?;
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let request = ServiceRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if request.customer_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    if request.status != ServiceStatus::Completed {
        return Err(AppError::BadRequest("only completed services can be rated".into()));
    }
    if request.rating.is_some() {
        return Err(AppError::BadRequest("service already rated".into()));
    }

    let mut active: RequestActive = request.into();
    active.rating = Set(Some(payload.rating));
    active.feedback = Set(payload.feedback);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Thanks for the feedback",
        request_from_entity(updated),
        None,
    ))
}

async fn lock_request(txn: &DatabaseTransaction, id: Uuid) -> AppResult<RequestModel> {
    ServiceRequests::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

fn ensure_visible(user: &AuthUser, request: &RequestModel) -> AppResult<()> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::VehicleOwner if request.customer_id == user.user_id => Ok(()),
        UserRole::ServiceProvider if request.service_provider_id == Some(user.user_id) => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

async fn audit_status(state: &AppState, user: &AuthUser, id: Uuid, status: ServiceStatus) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "service_status_changed",
        Some("service_requests"),
        Some(serde_json::json!({ "request_id": id, "status": status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}

pub fn request_from_entity(model: RequestModel) -> ServiceRequest {
    ServiceRequest {
        id: model.id,
        customer_id: model.customer_id,
        vehicle_id: model.vehicle_id,
        service_provider_id: model.service_provider_id,
        service_type: model.service_type,
        description: model.description,
        priority: model.priority,
        status: model.status,
        scheduled_date: model.scheduled_date.map(|d| d.with_timezone(&chrono::Utc)),
        location: model.location,
        estimated_cost: model.estimated_cost,
        actual_cost: model.actual_cost,
        commission_amount: model.commission_amount,
        rating: model.rating,
        feedback: model.feedback,
        notes: model.notes,
        completed_date: model.completed_date.map(|d| d.with_timezone(&chrono::Utc)),
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
