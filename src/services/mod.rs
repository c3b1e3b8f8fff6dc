//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el ciclo de
//! vida de las rutas y el envío de notificaciones sobre compras.

pub mod email_service;
pub mod notification_service;
pub mod push_service;
pub mod route_service;

pub use notification_service::*;
pub use route_service::*;
