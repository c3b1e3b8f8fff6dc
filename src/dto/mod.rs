//! Objetos de transferencia de la API HTTP

pub mod api_response;
pub mod route_dto;

pub use api_response::ApiResponse;
pub use route_dto::*;
