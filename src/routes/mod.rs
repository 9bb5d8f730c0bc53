use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod inventory;
pub mod leads;
pub mod orders;
pub mod params;
pub mod payments;
pub mod service_requests;
pub mod users;
pub mod vehicles;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/vehicles", vehicles::router())
        .nest("/service-requests", service_requests::router())
        .nest("/inventory", inventory::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/insurance-leads", leads::router())
        .nest("/payments", payments::router())
        .nest("/commissions", payments::commissions_router())
        .nest("/dashboard", dashboard::router())
}
