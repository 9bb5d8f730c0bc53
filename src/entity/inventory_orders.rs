use sea_orm::entity::prelude::*;

use crate::models::Priority;
use crate::workflow::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub service_provider_id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub total_amount: i64,
    pub commission_amount: i64,
    pub net_amount: i64,
    pub delivery_address: Json,
    pub status: OrderStatus,
    pub priority: Priority,
    pub packed_by: Option<Uuid>,
    pub packed_date: Option<DateTimeWithTimeZone>,
    pub dispatched_by: Option<Uuid>,
    pub dispatched_date: Option<DateTimeWithTimeZone>,
    pub tracking_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ServiceProviderId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::order_lines::Entity")]
    OrderLines,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::order_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
