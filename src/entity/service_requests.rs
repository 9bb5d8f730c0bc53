use sea_orm::entity::prelude::*;

use crate::models::Priority;
use crate::workflow::ServiceStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_provider_id: Option<Uuid>,
    pub service_type: String,
    pub description: String,
    pub priority: Priority,
    pub status: ServiceStatus,
    pub scheduled_date: Option<DateTimeWithTimeZone>,
    pub location: Option<Json>,
    pub estimated_cost: Option<i64>,
    pub actual_cost: Option<i64>,
    pub commission_amount: Option<i64>,
    pub rating: Option<i16>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
    pub completed_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id"
    )]
    Vehicle,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
