//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio: rutas de reparto y las
//! compras que se les asignan.

pub mod route;

pub use route::*;
