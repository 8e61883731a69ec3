//! Presentation layer: HTTP handlers, models and routing

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;

pub use controllers::AppState;
pub use routes::create_router;
