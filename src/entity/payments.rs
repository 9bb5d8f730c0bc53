use sea_orm::entity::prelude::*;

use crate::workflow::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub payee_id: Uuid,
    pub order_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub payment_ref: String,
    pub amount: i64,
    pub net_amount: Option<i64>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub collected_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PayeeId",
        to = "super::users::Column::Id"
    )]
    Payee,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
