use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::workflow::{
    CommissionStatus, LeadStatus, OrderStatus, PaymentStatus, ServiceStatus,
};

/// The persona attached to an account. Chosen once at registration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "service_provider")]
    ServiceProvider,
    #[sea_orm(string_value = "vehicle_owner")]
    VehicleOwner,
    #[sea_orm(string_value = "payment_collector")]
    PaymentCollector,
    #[sea_orm(string_value = "warehouse_staff")]
    WarehouseStaff,
    #[sea_orm(string_value = "dispatcher")]
    Dispatcher,
    #[sea_orm(string_value = "insurance_agent")]
    InsuranceAgent,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::ServiceProvider => "service_provider",
            UserRole::VehicleOwner => "vehicle_owner",
            UserRole::PaymentCollector => "payment_collector",
            UserRole::WarehouseStaff => "warehouse_staff",
            UserRole::Dispatcher => "dispatcher",
            UserRole::InsuranceAgent => "insurance_agent",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "service_provider" => Ok(UserRole::ServiceProvider),
            "vehicle_owner" => Ok(UserRole::VehicleOwner),
            "payment_collector" => Ok(UserRole::PaymentCollector),
            "warehouse_staff" => Ok(UserRole::WarehouseStaff),
            "dispatcher" => Ok(UserRole::Dispatcher),
            "insurance_agent" => Ok(UserRole::InsuranceAgent),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "emergency")]
    Emergency,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    #[sea_orm(string_value = "new_policy")]
    NewPolicy,
    #[sea_orm(string_value = "renewal")]
    Renewal,
    #[sea_orm(string_value = "claim_assistance")]
    ClaimAssistance,
}

impl LeadType {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadType::NewPolicy => "new_policy",
            LeadType::Renewal => "renewal",
            LeadType::ClaimAssistance => "claim_assistance",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum VehicleType {
    #[sea_orm(string_value = "2w")]
    #[serde(rename = "2w")]
    TwoWheeler,
    #[sea_orm(string_value = "3w")]
    #[serde(rename = "3w")]
    ThreeWheeler,
    #[sea_orm(string_value = "4w")]
    #[serde(rename = "4w")]
    FourWheeler,
}

/// Derived from stock_quantity vs minimum_stock; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

pub fn stock_status(stock_quantity: i32, minimum_stock: i32) -> StockStatus {
    if stock_quantity <= 0 {
        StockStatus::OutOfStock
    } else if stock_quantity <= minimum_stock {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub user_type: UserRole,
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub commission_rate_bps: i32,
    pub status: AccountStatus,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub fuel_type: String,
    pub vehicle_type: VehicleType,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,
    pub mileage_km: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_provider_id: Option<Uuid>,
    pub service_type: String,
    pub description: String,
    pub priority: Priority,
    pub status: ServiceStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub location: Option<serde_json::Value>,
    pub estimated_cost: Option<i64>,
    pub actual_cost: Option<i64>,
    pub commission_amount: Option<i64>,
    pub rating: Option<i16>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_name: String,
    pub item_code: String,
    pub category: String,
    pub brand: String,
    pub unit_price: i64,
    pub mrp: i64,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub unit_of_measure: String,
    pub is_active: bool,
    #[schema(value_type = Vec<String>)]
    pub compatible_vehicles: serde_json::Value,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub inventory_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryOrder {
    pub id: Uuid,
    pub service_provider_id: Uuid,
    pub order_number: String,
    pub total_amount: i64,
    pub commission_amount: i64,
    pub net_amount: i64,
    #[schema(value_type = Object)]
    pub delivery_address: serde_json::Value,
    pub status: OrderStatus,
    pub priority: Priority,
    pub packed_by: Option<Uuid>,
    pub packed_date: Option<DateTime<Utc>>,
    pub dispatched_by: Option<Uuid>,
    pub dispatched_date: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub inventory_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InsuranceLead {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub insurance_agent_id: Option<Uuid>,
    pub lead_type: LeadType,
    pub current_policy: Option<String>,
    pub coverage_required: Option<String>,
    pub budget_range: Option<String>,
    pub status: LeadStatus,
    #[schema(value_type = Vec<Object>)]
    pub quotes_provided: serde_json::Value,
    #[schema(value_type = Object)]
    pub converted_policy: Option<serde_json::Value>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub payee_id: Uuid,
    pub order_id: Option<Uuid>,
    pub payment_ref: String,
    pub amount: i64,
    pub net_amount: Option<i64>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub collected_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Commission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: String,
    pub transaction_id: Uuid,
    pub gross_amount: i64,
    pub commission_amount: i64,
    pub net_amount: i64,
    pub status: CommissionStatus,
    pub settlement_batch: Option<String>,
    pub settlement_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(stock_status(0, 5), StockStatus::OutOfStock);
        assert_eq!(stock_status(3, 5), StockStatus::LowStock);
        assert_eq!(stock_status(5, 5), StockStatus::LowStock);
        assert_eq!(stock_status(6, 5), StockStatus::InStock);
    }

    #[test]
    fn user_role_round_trips_through_str() {
        for role in [
            UserRole::Admin,
            UserRole::ServiceProvider,
            UserRole::VehicleOwner,
            UserRole::PaymentCollector,
            UserRole::WarehouseStaff,
            UserRole::Dispatcher,
            UserRole::InsuranceAgent,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
        assert!("mechanic".parse::<UserRole>().is_err());
    }
}
