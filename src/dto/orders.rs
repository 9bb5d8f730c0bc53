use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{InventoryOrder, OrderLine, Priority};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<InventoryOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: InventoryOrder,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[schema(value_type = Object)]
    pub delivery_address: serde_json::Value,
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DispatchRequest {
    /// Generated when absent.
    pub tracking_number: Option<String>,
}
