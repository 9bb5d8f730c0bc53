use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    commission,
    dto::payments::{
        CommissionList, CreatePaymentRequest, PaymentList, SettleCommissionsRequest,
        SettlementResult, TransactionEntry, TransactionFeed, TransactionKind,
    },
    entity::{
        commissions::{
            ActiveModel as CommissionActive, Column as CommissionCol, Entity as Commissions,
            Model as CommissionModel,
        },
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_any},
    models::{Commission, Payment, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, PaymentListQuery},
    state::AppState,
    workflow::{CommissionStatus, PaymentStatus, ensure_transition},
};

fn next_payment_ref() -> String {
    format!("PAY-{}", Utc::now().timestamp_millis())
}

fn next_settlement_batch() -> String {
    format!("BATCH-{}", Utc::now().timestamp_millis())
}

pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any(user, &[UserRole::PaymentCollector])?;
    if payload.amount <= 0 {
        return Err(AppError::BadRequest("amount must be greater than 0".into()));
    }

    let (_, net_amount) = commission::split(payload.amount);

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        payee_id: Set(payload.payee_id),
        order_id: Set(payload.order_id),
        payment_ref: Set(next_payment_ref()),
        amount: Set(payload.amount),
        net_amount: Set(Some(net_amount)),
        payment_status: Set(PaymentStatus::Pending),
        payment_method: Set(payload.payment_method),
        collected_by: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_created",
        Some("payments"),
        Some(serde_json::json!({ "payment_id": payment.id, "amount": payment.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment created",
        payment_from_entity(payment),
        None,
    ))
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    match user.role {
        UserRole::Admin | UserRole::PaymentCollector => {}
        _ => {
            condition = condition.add(PaymentCol::PayeeId.eq(user.user_id));
        }
    }
    if let Some(status) = query.status {
        condition = condition.add(PaymentCol::PaymentStatus.eq(status));
    }

    let finder = Payments::find()
        .filter(condition)
        .order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .offset(offset as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn collect_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any(user, &[UserRole::PaymentCollector])?;
    transition_payment(state, user, id, PaymentStatus::Collected).await
}

pub async fn fail_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Payment>> {
    ensure_any(user, &[UserRole::PaymentCollector])?;
    transition_payment(state, user, id, PaymentStatus::Failed).await
}

async fn transition_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    to: PaymentStatus,
) -> AppResult<ApiResponse<Payment>> {
    let txn = state.orm.begin().await?;

    let payment = Payments::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_transition(payment.payment_status, to)?;

    let mut active: PaymentActive = payment.into();
    active.payment_status = Set(to);
    if to == PaymentStatus::Collected {
        active.collected_by = Set(Some(user.user_id));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_status_changed",
        Some("payments"),
        Some(serde_json::json!({ "payment_id": id, "status": to.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment updated",
        payment_from_entity(updated),
        None,
    ))
}

/// Payments and commissions merged into one feed, newest first.
pub async fn transaction_feed(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TransactionFeed>> {
    let (_, limit, _) = pagination.normalize();

    let all = matches!(user.role, UserRole::Admin | UserRole::PaymentCollector);

    let mut payment_cond = Condition::all();
    let mut commission_cond = Condition::all();
    if !all {
        payment_cond = payment_cond.add(PaymentCol::PayeeId.eq(user.user_id));
        commission_cond = commission_cond.add(CommissionCol::UserId.eq(user.user_id));
    }

    let payments = Payments::find()
        .filter(payment_cond)
        .order_by_desc(PaymentCol::CreatedAt)
        .limit(limit as u64)
        .all(&state.orm)
        .await?;
    let commissions = Commissions::find()
        .filter(commission_cond)
        .order_by_desc(CommissionCol::CreatedAt)
        .limit(limit as u64)
        .all(&state.orm)
        .await?;

    let mut items: Vec<TransactionEntry> = payments
        .into_iter()
        .map(|p| TransactionEntry {
            kind: TransactionKind::Payment,
            id: p.id,
            reference: p.payment_ref,
            amount: p.amount,
            status: p.payment_status.as_str().to_string(),
            created_at: p.created_at.with_timezone(&chrono::Utc),
        })
        .chain(commissions.into_iter().map(|c| TransactionEntry {
            kind: TransactionKind::Commission,
            id: c.id,
            reference: c.transaction_type,
            amount: c.commission_amount,
            status: c.status.as_str().to_string(),
            created_at: c.created_at.with_timezone(&chrono::Utc),
        }))
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit as usize);

    Ok(ApiResponse::success(
        "OK",
        TransactionFeed { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_commissions(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CommissionList>> {
    let (page, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if user.role != UserRole::Admin {
        condition = condition.add(CommissionCol::UserId.eq(user.user_id));
    }

    let finder = Commissions::find()
        .filter(condition)
        .order_by_desc(CommissionCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .offset(offset as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(commission_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CommissionList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Settle a batch of commissions under one batch id. Rows already settled
/// (or unknown) fail the whole batch rather than being skipped silently.
pub async fn settle_commissions(
    state: &AppState,
    user: &AuthUser,
    payload: SettleCommissionsRequest,
) -> AppResult<ApiResponse<SettlementResult>> {
    ensure_admin(user)?;
    if payload.commission_ids.is_empty() {
        return Err(AppError::BadRequest("commission_ids must not be empty".into()));
    }

    let batch = next_settlement_batch();
    let now = Utc::now();

    let txn = state.orm.begin().await?;

    let rows = Commissions::find()
        .filter(CommissionCol::Id.is_in(payload.commission_ids.clone()))
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if rows.len() != payload.commission_ids.len() {
        return Err(AppError::BadRequest("unknown commission id in batch".into()));
    }

    let settled = rows.len();
    for row in rows {
        ensure_transition(row.status, CommissionStatus::Settled)?;
        let mut active: CommissionActive = row.into();
        active.status = Set(CommissionStatus::Settled);
        active.settlement_batch = Set(Some(batch.clone()));
        active.settlement_date = Set(Some(now.into()));
        active.update(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "commissions_settled",
        Some("commissions"),
        Some(serde_json::json!({ "settlement_batch": batch, "count": settled })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Commissions settled",
        SettlementResult {
            settlement_batch: batch,
            settled,
        },
        None,
    ))
}

pub fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        payee_id: model.payee_id,
        order_id: model.order_id,
        payment_ref: model.payment_ref,
        amount: model.amount,
        net_amount: model.net_amount,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        collected_by: model.collected_by,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}

pub fn commission_from_entity(model: CommissionModel) -> Commission {
    Commission {
        id: model.id,
        user_id: model.user_id,
        transaction_type: model.transaction_type,
        transaction_id: model.transaction_id,
        gross_amount: model.gross_amount,
        commission_amount: model.commission_amount,
        net_amount: model.net_amount,
        status: model.status,
        settlement_batch: model.settlement_batch,
        settlement_date: model.settlement_date.map(|d| d.with_timezone(&chrono::Utc)),
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prefixes() {
        assert!(next_payment_ref().starts_with("PAY-"));
        assert!(next_settlement_batch().starts_with("BATCH-"));
    }
}
