pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod inventory;
pub mod leads;
pub mod orders;
pub mod payments;
pub mod services;
pub mod users;
pub mod vehicles;
