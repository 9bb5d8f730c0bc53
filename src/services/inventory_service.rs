use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::inventory::{CreateInventoryItemRequest, InventoryList, StockAdjustRequest, UpdateInventoryItemRequest},
    entity::inventory_items::{
        ActiveModel as ItemActive, Column as ItemCol, Entity as InventoryItems,
        Model as ItemModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any},
    models::{self, InventoryItem, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{InventoryQuery, LowStockQuery},
    state::AppState,
};

pub async fn list_items(
    state: &AppState,
    user: &AuthUser,
    query: InventoryQuery,
) -> AppResult<ApiResponse<InventoryList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    // Only catalogue managers may browse inactive items.
    let include_inactive = query.include_inactive.unwrap_or(false)
        && matches!(user.role, UserRole::Admin | UserRole::WarehouseStaff);
    if !include_inactive {
        condition = condition.add(ItemCol::IsActive.eq(true));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ItemCol::ItemName).ilike(pattern.clone()))
                .add(Expr::col(ItemCol::ItemCode).ilike(pattern.clone()))
                .add(Expr::col(ItemCol::Brand).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ItemCol::Category.eq(category.clone()));
    }

    let finder = InventoryItems::find()
        .filter(condition)
        .order_by_desc(ItemCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Inventory",
        InventoryList { items },
        Some(meta),
    ))
}

pub async fn get_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<InventoryItem>> {
    let item = InventoryItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(item_from_entity);
    match item {
        Some(item) => Ok(ApiResponse::success("Item", item, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;

    let exist: Option<ItemModel> = InventoryItems::find()
        .filter(ItemCol::ItemCode.eq(payload.item_code.clone()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("item code already exists".into()));
    }
    if payload.unit_price < 0 || payload.stock_quantity < 0 {
        return Err(AppError::BadRequest(
            "price and stock must not be negative".into(),
        ));
    }

    let active = ItemActive {
        id: Set(Uuid::new_v4()),
        item_name: Set(payload.item_name),
        item_code: Set(payload.item_code),
        category: Set(payload.category),
        brand: Set(payload.brand),
        unit_price: Set(payload.unit_price),
        mrp: Set(payload.mrp),
        stock_quantity: Set(payload.stock_quantity),
        minimum_stock: Set(payload.minimum_stock),
        unit_of_measure: Set(payload.unit_of_measure),
        is_active: Set(true),
        compatible_vehicles: Set(payload
            .compatible_vehicles
            .unwrap_or_else(|| serde_json::json!([]))),
        created_at: NotSet,
    };
    let item = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_create",
        Some("inventory_items"),
        Some(serde_json::json!({ "inventory_id": item.id, "item_code": item.item_code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item created",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;

    let existing = InventoryItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let mut active: ItemActive = existing.into();
    if let Some(item_name) = payload.item_name {
        active.item_name = Set(item_name);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(unit_price) = payload.unit_price {
        active.unit_price = Set(unit_price);
    }
    if let Some(mrp) = payload.mrp {
        active.mrp = Set(mrp);
    }
    if let Some(minimum_stock) = payload.minimum_stock {
        active.minimum_stock = Set(minimum_stock);
    }
    if let Some(unit_of_measure) = payload.unit_of_measure {
        active.unit_of_measure = Set(unit_of_measure);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(compatible_vehicles) = payload.compatible_vehicles {
        active.compatible_vehicles = Set(compatible_vehicles);
    }

    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Item updated",
        item_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Relative stock adjustment with a row lock; stock can never go negative.
pub async fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let item = InventoryItems::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let item = match item {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let new_stock = item.stock_quantity + payload.delta;
    if new_stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let mut active: ItemActive = item.into();
    active.stock_quantity = Set(new_stock);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_stock_adjust",
        Some("inventory_items"),
        Some(serde_json::json!({ "inventory_id": updated.id, "delta": payload.delta })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock updated",
        item_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Items at or below their own minimum stock level, lowest stock first.
pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<InventoryList>> {
    ensure_any(user, &[UserRole::WarehouseStaff])?;
    let (page, limit, offset) = query.pagination.normalize();

    let finder = InventoryItems::find()
        .filter(Expr::col(ItemCol::StockQuantity).lte(Expr::col(ItemCol::MinimumStock)))
        .order_by_asc(ItemCol::StockQuantity)
        .order_by_desc(ItemCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Low stock",
        InventoryList { items },
        Some(meta),
    ))
}

pub fn item_from_entity(model: ItemModel) -> InventoryItem {
    let stock_status = models::stock_status(model.stock_quantity, model.minimum_stock);
    InventoryItem {
        id: model.id,
        item_name: model.item_name,
        item_code: model.item_code,
        category: model.category,
        brand: model.brand,
        unit_price: model.unit_price,
        mrp: model.mrp,
        stock_quantity: model.stock_quantity,
        minimum_stock: model.minimum_stock,
        unit_of_measure: model.unit_of_measure,
        is_active: model.is_active,
        compatible_vehicles: model.compatible_vehicles,
        stock_status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
