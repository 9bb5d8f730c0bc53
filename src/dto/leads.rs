use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{InsuranceLead, LeadType, Priority};

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadList {
    pub items: Vec<InsuranceLead>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeadRequest {
    pub vehicle_id: Uuid,
    pub lead_type: LeadType,
    pub current_policy: Option<String>,
    pub coverage_required: Option<String>,
    pub budget_range: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignAgentRequest {
    pub insurance_agent_id: Uuid,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteLeadRequest {
    #[schema(value_type = Object)]
    pub quote: serde_json::Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertLeadRequest {
    #[schema(value_type = Object)]
    pub converted_policy: serde_json::Value,
}
