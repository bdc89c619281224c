//! HTTP adapter: the thin inbound surface over the turn and admin
//! use cases.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::routes;
