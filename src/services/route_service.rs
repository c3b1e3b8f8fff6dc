//! Servicio de ciclo de vida de rutas
//!
//! Aplica las reglas de negocio sobre las rutas: creación, actualización,
//! asignación de compras y cierre. Es el único cliente escritor del
//! repositorio y no guarda estado propio.
//!
//! Las secuencias leer-y-escribir no son atómicas en conjunto: el cambio
//! automático a `IN_PROGRESS` tras una asignación, `update_route`,
//! `update_purchase_status` y el cierre de ruta leen la ruta y luego
//! sobrescriben el registro completo. Una escritura concurrente sobre la
//! misma ruta entre la lectura y la escritura se pierde (gana el último
//! escritor); en `update_purchase_status` eso incluye una compra asignada
//! mientras tanto.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::route::{
    Purchase, PurchaseId, Route, RouteDraft, RouteId, RouteStatus,
};
use crate::repositories::{RouteRepository, StoreError};

/// Clasificación de errores del ciclo de vida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    InvalidState,
    IncompleteDelivery,
}

/// Errores del servicio de rutas
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("cannot {operation} route {route_id} with status {status}")]
    InvalidState {
        operation: &'static str,
        route_id: RouteId,
        status: RouteStatus,
    },

    #[error("cannot complete route {route_id}: purchases {pending:?} are not delivered")]
    IncompleteDelivery {
        route_id: RouteId,
        pending: Vec<PurchaseId>,
    },

    #[error("purchase {purchase_id} not found in route {route_id}")]
    PurchaseNotFound {
        route_id: RouteId,
        purchase_id: PurchaseId,
    },

    #[error("failed to {operation}{}: {source}", route_suffix(.route_id))]
    Store {
        operation: &'static str,
        route_id: Option<RouteId>,
        #[source]
        source: StoreError,
    },
}

fn route_suffix(route_id: &Option<RouteId>) -> String {
    route_id.map(|id| format!(" (route {id})")).unwrap_or_default()
}

impl RouteError {
    fn store(operation: &'static str, route_id: Option<RouteId>, source: StoreError) -> Self {
        RouteError::Store {
            operation,
            route_id,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::Validation(_) => ErrorKind::Validation,
            RouteError::InvalidState { .. } => ErrorKind::InvalidState,
            RouteError::IncompleteDelivery { .. } => ErrorKind::IncompleteDelivery,
            RouteError::PurchaseNotFound { .. } => ErrorKind::NotFound,
            RouteError::Store { source, .. } => match source {
                StoreError::NotFound(_) => ErrorKind::NotFound,
                StoreError::Validation(_) => ErrorKind::Validation,
                StoreError::Conflict { .. } => ErrorKind::Conflict,
            },
        }
    }
}

pub type RouteResult<T> = Result<T, RouteError>;

/// Servicio de rutas - clonable, comparte el repositorio
#[derive(Clone)]
pub struct RouteService {
    repository: Arc<dyn RouteRepository>,
}

impl RouteService {
    pub fn new(repository: Arc<dyn RouteRepository>) -> Self {
        Self { repository }
    }

    /// Crear una ruta nueva en estado `PENDING`
    pub async fn create_route(&self, draft: RouteDraft) -> RouteResult<RouteId> {
        draft.validate()?;

        let now = Utc::now();
        let route = Route {
            id: 0,
            name: draft.name,
            vehicle: draft.vehicle,
            driver: draft.driver,
            status: RouteStatus::Pending,
            purchases: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .repository
            .create(route)
            .await
            .map_err(|e| RouteError::store("create route", None, e))?;

        log::info!("Route {} created", id);
        Ok(id)
    }

    pub async fn get_route(&self, id: RouteId) -> RouteResult<Route> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| RouteError::store("retrieve route", Some(id), e))
    }

    /// Actualizar nombre, vehículo, conductor y estado de una ruta
    ///
    /// Las compras y la fecha de creación se conservan. El estado del
    /// borrador se aplica tal cual, sin pasar por la máquina de estados.
    pub async fn update_route(&self, id: RouteId, draft: RouteDraft) -> RouteResult<()> {
        draft.validate()?;

        let mut route = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| RouteError::store("load route", Some(id), e))?;

        if let Some(status) = draft.status {
            if status != route.status {
                log::warn!(
                    "Route {} status overwritten from {} to {} outside the lifecycle rules",
                    id,
                    route.status,
                    status
                );
            }
            route.status = status;
        }
        route.name = draft.name;
        route.vehicle = draft.vehicle;
        route.driver = draft.driver;
        route.updated_at = Utc::now();

        self.repository
            .update(id, route)
            .await
            .map_err(|e| RouteError::store("update route", Some(id), e))
    }

    /// Rutas con el estado indicado; sin estado devuelve todas
    pub async fn get_routes_by_status(&self, status: Option<RouteStatus>) -> RouteResult<Vec<Route>> {
        match status {
            None => self
                .repository
                .list()
                .await
                .map_err(|e| RouteError::store("list routes", None, e)),
            Some(status) => self
                .repository
                .find_by_status(status)
                .await
                .map_err(|e| RouteError::store("retrieve routes", None, e)),
        }
    }

    /// Asignar una compra a una ruta abierta
    ///
    /// La primera compra de una ruta `PENDING` la pasa a `IN_PROGRESS`.
    pub async fn assign_purchase_to_route(&self, route_id: RouteId, purchase: Purchase) -> RouteResult<()> {
        let route = self
            .repository
            .get_by_id(route_id)
            .await
            .map_err(|e| RouteError::store("load route", Some(route_id), e))?;

        if !route.status.accepts_purchases() {
            return Err(RouteError::InvalidState {
                operation: "assign purchase to",
                route_id,
                status: route.status,
            });
        }

        let purchase_id = purchase.id;
        self.repository
            .assign_purchase(route_id, purchase)
            .await
            .map_err(|e| RouteError::store("assign purchase to route", Some(route_id), e))?;
        log::info!("Purchase {} assigned to route {}", purchase_id, route_id);

        if route.status == RouteStatus::Pending {
            // Releer para no pisar la compra recién agregada
            let mut route = self
                .repository
                .get_by_id(route_id)
                .await
                .map_err(|e| RouteError::store("update route status", Some(route_id), e))?;

            if route.status == RouteStatus::Pending {
                route.status = RouteStatus::InProgress;
                route.updated_at = Utc::now();
                self.repository
                    .update(route_id, route)
                    .await
                    .map_err(|e| RouteError::store("update route status", Some(route_id), e))?;
                log::info!("Route {} moved to {}", route_id, RouteStatus::InProgress);
            }
        }

        Ok(())
    }

    /// Cambiar el estado de entrega de una compra ya asignada
    pub async fn update_purchase_status(
        &self,
        route_id: RouteId,
        purchase_id: PurchaseId,
        status: String,
    ) -> RouteResult<Purchase> {
        let mut route = self
            .repository
            .get_by_id(route_id)
            .await
            .map_err(|e| RouteError::store("load route", Some(route_id), e))?;

        if !route.status.accepts_purchases() {
            return Err(RouteError::InvalidState {
                operation: "update purchases of",
                route_id,
                status: route.status,
            });
        }

        let purchase = route
            .purchases
            .iter_mut()
            .find(|purchase| purchase.id == purchase_id)
            .ok_or(RouteError::PurchaseNotFound { route_id, purchase_id })?;
        purchase.status = status;
        let purchase = purchase.clone();

        route.updated_at = Utc::now();
        self.repository
            .update(route_id, route)
            .await
            .map_err(|e| RouteError::store("update purchase", Some(route_id), e))?;

        log::info!(
            "Purchase {} of route {} marked as {}",
            purchase_id,
            route_id,
            purchase.status
        );
        Ok(purchase)
    }

    /// Marcar una ruta como completada si todas sus compras fueron entregadas
    ///
    /// Errores: `NotFound` si la ruta no existe, `IncompleteDelivery` con los
    /// ids pendientes y `InvalidState` si la ruta ya está `COMPLETED` o
    /// `CANCELLED` (los estados terminales no se vuelven a cerrar).
    pub async fn complete_route(&self, route_id: RouteId) -> RouteResult<()> {
        let mut route = self
            .repository
            .get_by_id(route_id)
            .await
            .map_err(|e| RouteError::store("load route", Some(route_id), e))?;

        if route.status.is_terminal() {
            return Err(RouteError::InvalidState {
                operation: "complete",
                route_id,
                status: route.status,
            });
        }

        let pending = route.undelivered_purchases();
        if !pending.is_empty() {
            return Err(RouteError::IncompleteDelivery { route_id, pending });
        }

        route.status = RouteStatus::Completed;
        route.updated_at = Utc::now();
        self.repository
            .update(route_id, route)
            .await
            .map_err(|e| RouteError::store("complete route", Some(route_id), e))?;

        log::info!("Route {} completed", route_id);
        Ok(())
    }
}
