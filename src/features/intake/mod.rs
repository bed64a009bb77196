pub mod dtos;
pub mod flows;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::IntakeService;
