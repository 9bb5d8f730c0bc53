use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Vehicle, VehicleType};

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleList {
    pub items: Vec<Vehicle>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub fuel_type: String,
    pub vehicle_type: VehicleType,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,
    pub mileage_km: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVehicleRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub registration_number: Option<String>,
    pub fuel_type: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,
    pub mileage_km: Option<i32>,
}
