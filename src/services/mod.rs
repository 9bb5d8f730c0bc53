pub mod auth_service;
pub mod cart_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod lead_service;
pub mod order_service;
pub mod payment_service;
pub mod service_request_service;
pub mod user_service;
pub mod vehicle_service;
