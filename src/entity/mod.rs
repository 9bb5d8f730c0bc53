pub mod audit_logs;
pub mod cart_items;
pub mod commissions;
pub mod insurance_leads;
pub mod inventory_items;
pub mod inventory_orders;
pub mod order_lines;
pub mod payments;
pub mod service_requests;
pub mod users;
pub mod vehicles;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use commissions::Entity as Commissions;
pub use insurance_leads::Entity as InsuranceLeads;
pub use inventory_items::Entity as InventoryItems;
pub use inventory_orders::Entity as InventoryOrders;
pub use order_lines::Entity as OrderLines;
pub use payments::Entity as Payments;
pub use service_requests::Entity as ServiceRequests;
pub use users::Entity as Users;
pub use vehicles::Entity as Vehicles;
