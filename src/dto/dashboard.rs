use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Role-specific dashboard payload: counters keyed by stat name plus a short
/// recent-activity feed. `sample_slices` names every collection that was
/// substituted with demo data because the user had none of their own.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct DashboardData {
    #[schema(value_type = Object)]
    pub stats: BTreeMap<String, i64>,
    pub activity: Vec<ActivityItem>,
    pub sample_slices: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub title: String,
    pub time: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Service,
    Order,
    Payment,
    Lead,
}
