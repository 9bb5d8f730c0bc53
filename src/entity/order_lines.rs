use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub inventory_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_orders::Entity",
        from = "Column::OrderId",
        to = "super::inventory_orders::Column::Id"
    )]
    InventoryOrders,
    #[sea_orm(
        belongs_to = "super::inventory_items::Entity",
        from = "Column::InventoryId",
        to = "super::inventory_items::Column::Id"
    )]
    InventoryItems,
}

impl Related<super::inventory_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryOrders.def()
    }
}

impl Related<super::inventory_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
