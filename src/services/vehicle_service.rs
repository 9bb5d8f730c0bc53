use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList},
    entity::vehicles::{
        ActiveModel as VehicleActive, Column as VehicleCol, Entity as Vehicles,
        Model as VehicleModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{UserRole, Vehicle},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_vehicles(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<VehicleList>> {
    let (page, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    // Admins see the whole fleet; everyone else only their own vehicles.
    if user.role != UserRole::Admin {
        condition = condition.add(VehicleCol::OwnerId.eq(user.user_id));
    }

    let finder = Vehicles::find()
        .filter(condition)
        .order_by_desc(VehicleCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(vehicle_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Vehicles",
        VehicleList { items },
        Some(meta),
    ))
}

pub async fn get_vehicle(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Vehicle>> {
    let model = find_owned(state, user, id).await?;
    Ok(ApiResponse::success("Vehicle", vehicle_from_entity(model), None))
}

pub async fn create_vehicle(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVehicleRequest,
) -> AppResult<ApiResponse<Vehicle>> {
    let exist: Option<VehicleModel> = Vehicles::find()
        .filter(VehicleCol::RegistrationNumber.eq(payload.registration_number.clone()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest(
            "registration number already exists".into(),
        ));
    }

    let active = VehicleActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(user.user_id),
        make: Set(payload.make),
        model: Set(payload.model),
        year: Set(payload.year),
        registration_number: Set(payload.registration_number),
        fuel_type: Set(payload.fuel_type),
        vehicle_type: Set(payload.vehicle_type),
        engine_number: Set(payload.engine_number),
        chassis_number: Set(payload.chassis_number),
        mileage_km: Set(payload.mileage_km),
        created_at: NotSet,
    };
    let vehicle = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "vehicle_create",
        Some("vehicles"),
        Some(serde_json::json!({ "vehicle_id": vehicle.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Vehicle created",
        vehicle_from_entity(vehicle),
        Some(Meta::empty()),
    ))
}

pub async fn update_vehicle(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVehicleRequest,
) -> AppResult<ApiResponse<Vehicle>> {
    let existing = find_owned(state, user, id).await?;

    let mut active: VehicleActive = existing.into();
    if let Some(make) = payload.make {
        active.make = Set(make);
    }
    if let Some(model) = payload.model {
        active.model = Set(model);
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(registration_number) = payload.registration_number {
        active.registration_number = Set(registration_number);
    }
    if let Some(fuel_type) = payload.fuel_type {
        active.fuel_type = Set(fuel_type);
    }
    if let Some(vehicle_type) = payload.vehicle_type {
        active.vehicle_type = Set(vehicle_type);
    }
    if let Some(engine_number) = payload.engine_number {
        active.engine_number = Set(Some(engine_number));
    }
    if let Some(chassis_number) = payload.chassis_number {
        active.chassis_number = Set(Some(chassis_number));
    }
    if let Some(mileage_km) = payload.mileage_km {
        active.mileage_km = Set(Some(mileage_km));
    }

    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Vehicle updated",
        vehicle_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_vehicle(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_owned(state, user, id).await?;

    Vehicles::delete_by_id(existing.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "vehicle_delete",
        Some("vehicles"),
        Some(serde_json::json!({ "vehicle_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Vehicle deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Fetch a vehicle enforcing ownership (admin bypasses).
async fn find_owned(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<VehicleModel> {
    let model = Vehicles::find_by_id(id).one(&state.orm).await?;
    let model = match model {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    if user.role != UserRole::Admin && model.owner_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(model)
}

pub fn vehicle_from_entity(model: VehicleModel) -> Vehicle {
    Vehicle {
        id: model.id,
        owner_id: model.owner_id,
        make: model.make,
        model: model.model,
        year: model.year,
        registration_number: model.registration_number,
        fuel_type: model.fuel_type,
        vehicle_type: model.vehicle_type,
        engine_number: model.engine_number,
        chassis_number: model.chassis_number,
        mileage_km: model.mileage_km,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
