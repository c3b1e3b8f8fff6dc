//! Repositorios
//!
//! Este módulo define el contrato de almacenamiento de rutas. La capa de
//! servicios solo conoce el trait `RouteRepository`, de modo que cualquier
//! backend (memoria, disco, base de datos) puede sustituir al de memoria.

pub mod route_repository;

pub use route_repository::InMemoryRouteRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::route::{Purchase, PurchaseId, Route, RouteId, RouteStatus};

/// Errores del repositorio de rutas
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("route {0} not found")]
    NotFound(RouteId),

    #[error("invalid route: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("purchase {purchase_id} already exists in route {route_id}")]
    Conflict {
        route_id: RouteId,
        purchase_id: PurchaseId,
    },
}

/// Almacenamiento de rutas
///
/// Las implementaciones deben ser seguras ante acceso concurrente: cada
/// operación es atómica respecto de las demás y devuelve copias, nunca
/// referencias al estado interno.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Valida y guarda una ruta nueva, devolviendo el id asignado
    async fn create(&self, route: Route) -> Result<RouteId, StoreError>;

    async fn get_by_id(&self, id: RouteId) -> Result<Route, StoreError>;

    /// Reemplaza la ruta completa (no hace merge de campos)
    async fn update(&self, id: RouteId, route: Route) -> Result<(), StoreError>;

    async fn delete(&self, id: RouteId) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Route>, StoreError>;

    async fn find_by_status(&self, status: RouteStatus) -> Result<Vec<Route>, StoreError>;

    /// Agrega la compra al final de la lista de la ruta
    async fn assign_purchase(&self, route_id: RouteId, purchase: Purchase) -> Result<(), StoreError>;
}
