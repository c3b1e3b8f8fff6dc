//! Servicio de rutas de reparto
//!
//! Almacén en memoria de rutas con sus compras, servicio de ciclo de vida
//! (PENDING → IN_PROGRESS → COMPLETED, o CANCELLED) y la API HTTP que lo expone.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
