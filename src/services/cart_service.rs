use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartLine, CartList, UpdateCartItemRequest},
    entity::{
        cart_items::{
            ActiveModel as CartActive, Column as CartCol, Entity as CartItems,
            Model as CartModel,
        },
        inventory_items::{Entity as InventoryItems, Model as ItemModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::UserRole,
    response::{ApiResponse, Meta},
    services::inventory_service::item_from_entity,
    state::AppState,
};

/// Cart quantities always stay within [0, stock]; stock is whatever the
/// catalogue says at the time of the mutation.
fn clamp_to_stock(requested: i32, stock: i32) -> i32 {
    requested.clamp(0, stock.max(0))
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let rows: Vec<(CartModel, Option<ItemModel>)> = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt)
        .find_also_related(InventoryItems)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut total_amount: i64 = 0;
    for (line, item) in rows {
        let item = match item {
            Some(item) => item,
            None => continue, // catalogue entry removed since the line was added
        };
        total_amount += item.unit_price * line.quantity as i64;
        items.push(CartLine {
            id: line.id,
            item: item_from_entity(item),
            quantity: line.quantity,
        });
    }

    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            total_amount,
        },
        Some(Meta::empty()),
    ))
}

/// Add to (or bump) a cart line; quantity is capped at available stock.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<crate::models::CartItem>> {
    ensure_role(user, UserRole::ServiceProvider)?;
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = InventoryItems::find_by_id(payload.inventory_id)
        .one(&state.orm)
        .await?;
    let item = match item {
        Some(item) if item.is_active => item,
        Some(_) => return Err(AppError::BadRequest("item is not active".into())),
        None => return Err(AppError::BadRequest("item not found".into())),
    };
    if item.stock_quantity <= 0 {
        return Err(AppError::BadRequest("item is out of stock".into()));
    }

    let exist: Option<CartModel> = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::InventoryId.eq(payload.inventory_id)),
        )
        .one(&state.orm)
        .await?;

    let line = if let Some(existing) = exist {
        let quantity = clamp_to_stock(
            existing.quantity.saturating_add(payload.quantity),
            item.stock_quantity,
        );
        let mut active: CartActive = existing.into();
        active.quantity = Set(quantity);
        active.update(&state.orm).await?
    } else {
        CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            inventory_id: Set(payload.inventory_id),
            quantity: Set(clamp_to_stock(payload.quantity, item.stock_quantity)),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "inventory_id": payload.inventory_id, "quantity": line.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", cart_item_from_entity(line), None))
}

/// Set a line's quantity; zero or less removes the line entirely.
pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    inventory_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let exist: Option<CartModel> = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::InventoryId.eq(inventory_id)),
        )
        .one(&state.orm)
        .await?;
    let existing = match exist {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    if payload.quantity <= 0 {
        existing.delete(&state.orm).await?;
        return Ok(ApiResponse::success(
            "Removed from cart",
            serde_json::json!({}),
            Some(Meta::empty()),
        ));
    }

    let item = InventoryItems::find_by_id(inventory_id).one(&state.orm).await?;
    let stock = item.map(|i| i.stock_quantity).unwrap_or(0);
    let quantity = clamp_to_stock(payload.quantity, stock);

    let mut active: CartActive = existing.into();
    active.quantity = Set(quantity);
    let line = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "OK",
        serde_json::json!({ "inventory_id": inventory_id, "quantity": line.quantity }),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    inventory_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_role(user, UserRole::ServiceProvider)?;

    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::InventoryId.eq(inventory_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "inventory_id": inventory_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn cart_item_from_entity(model: CartModel) -> crate::models::CartItem {
    crate::models::CartItem {
        id: model.id,
        user_id: model.user_id,
        inventory_id: model.inventory_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_to_stock;

    #[test]
    fn quantity_is_clamped_to_stock() {
        assert_eq!(clamp_to_stock(3, 10), 3);
        assert_eq!(clamp_to_stock(15, 10), 10);
        assert_eq!(clamp_to_stock(1, 1), 1);
    }

    #[test]
    fn quantity_never_goes_negative() {
        assert_eq!(clamp_to_stock(-2, 10), 0);
        assert_eq!(clamp_to_stock(5, 0), 0);
        assert_eq!(clamp_to_stock(5, -3), 0);
    }
}
