use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::InventoryItem;

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryList {
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryItemRequest {
    pub item_name: String,
    pub item_code: String,
    pub category: String,
    pub brand: String,
    pub unit_price: i64,
    pub mrp: i64,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub unit_of_measure: String,
    #[schema(value_type = Vec<String>)]
    pub compatible_vehicles: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInventoryItemRequest {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<i64>,
    pub mrp: Option<i64>,
    pub minimum_stock: Option<i32>,
    pub unit_of_measure: Option<String>,
    pub is_active: Option<bool>,
    #[schema(value_type = Vec<String>)]
    pub compatible_vehicles: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}
