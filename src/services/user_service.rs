use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::users::{AdminUpdateUserRequest, UpdateProfileRequest, UserList},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::UserListQuery,
    state::AppState,
};

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id).one(&state.orm).await?;
    let model = match model {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("OK", user_from_entity(model), None))
}

pub async fn update_me(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(user.user_id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let mut active: UserActive = existing.into();
    if let Some(full_name) = payload.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(business_name) = payload.business_name {
        active.business_name = Set(Some(business_name));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(city) = payload.city {
        active.city = Set(Some(city));
    }
    if let Some(pincode) = payload.pincode {
        active.pincode = Set(Some(pincode));
    }

    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Profile updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(role) = query.role {
        condition = condition.add(UserCol::UserType.eq(role));
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn admin_update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AdminUpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;

    if let Some(rate) = payload.commission_rate_bps {
        if !(0..=10_000).contains(&rate) {
            return Err(AppError::BadRequest(
                "commission_rate_bps must be within 0..=10000".into(),
            ));
        }
    }

    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let mut active: UserActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(is_verified) = payload.is_verified {
        active.is_verified = Set(is_verified);
    }
    if let Some(rate) = payload.commission_rate_bps {
        active.commission_rate_bps = Set(rate);
    }
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "user_admin_update",
        Some("users"),
        Some(serde_json::json!({ "target_user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        phone: model.phone,
        user_type: model.user_type,
        business_name: model.business_name,
        address: model.address,
        city: model.city,
        pincode: model.pincode,
        commission_rate_bps: model.commission_rate_bps,
        status: model.status,
        is_verified: model.is_verified,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
