use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    commission,
    dto::orders::{CheckoutRequest, DispatchRequest, OrderList, OrderWithLines},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        commissions::ActiveModel as CommissionActive,
        inventory_items::{Column as ItemCol, Entity as InventoryItems},
        inventory_orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as InventoryOrders,
            Model as OrderModel,
        },
        order_lines::{ActiveModel as LineActive, Column as LineCol, Entity as OrderLines},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any, ensure_role},
    models::{InventoryOrder, Priority, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    workflow::{CommissionStatus, OrderStatus, ensure_transition},
};

fn next_order_number() -> String {
    format!("ORD-{}", Utc::now().timestamp_millis())
}

fn next_tracking_number() -> String {
    format!("TRK-{}", Utc::now().timestamp_millis())
}

/// Turn the caller's cart into a pending order, atomically.
///
/// Stock is re-checked under row locks inside the transaction; a cart line
/// that has gone stale since it was added fails the whole checkout.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<InventoryOrder>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let txn = state.orm.begin().await?;

    let cart = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }

    let item_ids: Vec<Uuid> = cart.iter().map(|c| c.inventory_id).collect();
    let items = InventoryItems::find()
        .filter(ItemCol::Id.is_in(item_ids))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let mut total_amount: i64 = 0;
    let mut lines: Vec<LineActive> = Vec::with_capacity(cart.len());
    let order_id = Uuid::new_v4();

    for line in &cart {
        let item = items
            .iter()
            .find(|i| i.id == line.inventory_id)
            .ok_or_else(|| AppError::BadRequest("cart references a missing item".into()))?;
        if !item.is_active {
            return Err(AppError::BadRequest(format!(
                "{} is no longer available",
                item.item_name
            )));
        }
        if line.quantity > item.stock_quantity {
            return Err(AppError::BadRequest(format!(
                "insufficient stock for {}: {} requested, {} available",
                item.item_name, line.quantity, item.stock_quantity
            )));
        }

        let total_price = item.unit_price * line.quantity as i64;
        total_amount += total_price;
        lines.push(LineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            inventory_id: Set(item.id),
            item_name: Set(item.item_name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(item.unit_price),
            total_price: Set(total_price),
            created_at: NotSet,
        });

        InventoryItems::update_many()
            .col_expr(
                ItemCol::StockQuantity,
                Expr::col(ItemCol::StockQuantity).sub(line.quantity),
            )
            .filter(ItemCol::Id.eq(item.id))
            .exec(&txn)
            .await?;
    }

    let (commission_amount, net_amount) = commission::split(total_amount);

    let order = OrderActive {
        id: Set(order_id),
        service_provider_id: Set(user.user_id),
        order_number: Set(next_order_number()),
        total_amount: Set(total_amount),
        commission_amount: Set(commission_amount),
        net_amount: Set(net_amount),
        delivery_address: Set(payload.delivery_address),
        status: Set(OrderStatus::Pending),
        priority: Set(payload.priority.unwrap_or(Priority::Medium)),
        packed_by: NotSet,
        packed_date: NotSet,
        dispatched_by: NotSet,
        dispatched_date: NotSet,
        tracking_number: NotSet,
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    OrderLines::insert_many(lines).exec(&txn).await?;

    // Commission is deducted from the provider's payout at order time.
    CommissionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        transaction_type: Set("inventory_order".to_string()),
        transaction_id: Set(order_id),
        gross_amount: Set(total_amount),
        commission_amount: Set(commission_amount),
        net_amount: Set(net_amount),
        status: Set(CommissionStatus::Deducted),
        settlement_batch: NotSet,
        settlement_date: NotSet,
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_checkout",
        Some("inventory_orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
            "total_amount": total_amount,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        order_from_entity(order),
        None,
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    match user.role {
        UserRole::Admin | UserRole::WarehouseStaff | UserRole::Dispatcher => {}
        UserRole::ServiceProvider => {
            condition = condition.add(OrderCol::ServiceProviderId.eq(user.user_id));
        }
        _ => return Err(AppError::Forbidden),
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = InventoryOrders::find().filter(condition);
    finder = match query.sort_order {
        Some(SortOrder::Asc) => finder.order_by_asc(OrderCol::CreatedAt),
        _ => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .offset(offset as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = find_visible(state, user, id).await?;

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .order_by_asc(LineCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        None,
    ))
}

pub async fn approve_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryOrder>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;
    transition_order(state, user, id, OrderStatus::Approved, |_, _| {}).await
}

pub async fn pack_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryOrder>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;
    let packer = user.user_id;
    transition_order(state, user, id, OrderStatus::Packed, move |active, now| {
        active.packed_by = Set(Some(packer));
        active.packed_date = Set(Some(now));
    })
    .await
}

pub async fn dispatch_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: DispatchRequest,
) -> AppResult<ApiResponse<InventoryOrder>> {
    ensure_any(user, &[UserRole::Dispatcher])?;
    let dispatcher = user.user_id;
    let tracking = payload
        .tracking_number
        .filter(|t| !t.is_empty())
        .unwrap_or_else(next_tracking_number);
    transition_order(state, user, id, OrderStatus::Dispatched, move |active, now| {
        active.dispatched_by = Set(Some(dispatcher));
        active.dispatched_date = Set(Some(now));
        active.tracking_number = Set(Some(tracking.clone()));
    })
    .await
}

pub async fn deliver_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryOrder>> {
    ensure_any(user, &[UserRole::Dispatcher])?;
    transition_order(state, user, id, OrderStatus::Delivered, |_, _| {}).await
}

/// Cancelling restocks every line; only open orders can be cancelled.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryOrder>> {
    let txn = state.orm.begin().await?;

    let order = InventoryOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let own = order.service_provider_id == user.user_id
        && user.role == UserRole::ServiceProvider;
    if !(own || user.role == UserRole::Admin) {
        return Err(AppError::Forbidden);
    }
    ensure_transition(order.status, OrderStatus::Cancelled)?;

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;
    for line in &lines {
        InventoryItems::update_many()
            .col_expr(
                ItemCol::StockQuantity,
                Expr::col(ItemCol::StockQuantity).add(line.quantity),
            )
            .filter(ItemCol::Id.eq(line.inventory_id))
            .exec(&txn)
            .await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_cancelled",
        Some("inventory_orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order cancelled",
        order_from_entity(updated),
        None,
    ))
}

async fn transition_order<F>(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    to: OrderStatus,
    stamp: F,
) -> AppResult<ApiResponse<InventoryOrder>>
where
    F: FnOnce(&mut OrderActive, chrono::DateTime<chrono::FixedOffset>),
{
    let txn = state.orm.begin().await?;

    let order = InventoryOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_transition(order.status, to)?;

    let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
    let mut active: OrderActive = order.into();
    active.status = Set(to);
    active.updated_at = Set(now);
    stamp(&mut active, now);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_changed",
        Some("inventory_orders"),
        Some(serde_json::json!({ "order_id": id, "status": to.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(updated),
        None,
    ))
}

async fn find_visible(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<OrderModel> {
    let order = InventoryOrders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    match user.role {
        UserRole::Admin | UserRole::WarehouseStaff | UserRole::Dispatcher => Ok(order),
        UserRole::ServiceProvider if order.service_provider_id == user.user_id => Ok(order),
        _ => Err(AppError::Forbidden),
    }
}

pub fn order_from_entity(model: OrderModel) -> InventoryOrder {
    InventoryOrder {
        id: model.id,
        service_provider_id: model.service_provider_id,
        order_number: model.order_number,
        total_amount: model.total_amount,
        commission_amount: model.commission_amount,
        net_amount: model.net_amount,
        delivery_address: model.delivery_address,
        status: model.status,
        priority: model.priority,
        packed_by: model.packed_by,
        packed_date: model.packed_date.map(|d| d.with_timezone(&chrono::Utc)),
        dispatched_by: model.dispatched_by,
        dispatched_date: model.dispatched_date.map(|d| d.with_timezone(&chrono::Utc)),
        tracking_number: model.tracking_number,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}

pub fn line_from_entity(model: crate::entity::order_lines::Model) -> crate::models::OrderLine {
    crate::models::OrderLine {
        id: model.id,
        order_id: model.order_id,
        inventory_id: model.inventory_id,
        item_name: model.item_name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_carry_the_prefix() {
        assert!(next_order_number().starts_with("ORD-"));
        assert!(next_tracking_number().starts_with("TRK-"));
    }
}
