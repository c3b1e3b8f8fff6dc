//! Middleware del sistema
//!
//! Por ahora solo CORS; el trazado HTTP lo aporta `tower-http` en el router.

pub mod cors;

pub use cors::*;
