use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Priority, ServiceRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceRequestList {
    pub items: Vec<ServiceRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateServiceRequest {
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub scheduled_date: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub location: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignProviderRequest {
    pub service_provider_id: Uuid,
    pub estimated_cost: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteServiceRequest {
    pub actual_cost: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateServiceRequest {
    pub rating: i16,
    pub feedback: Option<String>,
}
