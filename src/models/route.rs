//! Modelo de Route
//!
//! Este módulo contiene el struct Route, las compras (Purchase) que viajan
//! embebidas en ella y el estado del ciclo de vida de la ruta.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Identificador de ruta, asignado por el repositorio
pub type RouteId = i64;

/// Identificador de compra, asignado por el cliente
pub type PurchaseId = i64;

/// Estado de entrega que permite completar una ruta
pub const DELIVERED: &str = "DELIVERED";

/// Estado de entrega de una compra fallida
pub const FAILED: &str = "FAILED";

/// Estado de la ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub const ALL: [RouteStatus; 4] = [
        RouteStatus::Pending,
        RouteStatus::InProgress,
        RouteStatus::Completed,
        RouteStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "PENDING",
            RouteStatus::InProgress => "IN_PROGRESS",
            RouteStatus::Completed => "COMPLETED",
            RouteStatus::Cancelled => "CANCELLED",
        }
    }

    /// Solo las rutas pendientes o en curso aceptan compras nuevas
    pub fn accepts_purchases(&self) -> bool {
        matches!(self, RouteStatus::Pending | RouteStatus::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route status '{0}'")]
pub struct ParseRouteStatusError(pub String);

impl FromStr for RouteStatus {
    type Err = ParseRouteStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RouteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseRouteStatusError(value.to_string()))
    }
}

/// Compra asociada a una ruta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(id: PurchaseId, description: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == DELIVERED
    }
}

/// Route principal - copia canónica guardada por el repositorio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Route {
    pub id: RouteId,

    #[validate(length(min = 1, message = "route name is required and cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "vehicle information is required"))]
    pub vehicle: String,

    #[validate(length(min = 1, message = "driver information is required"))]
    pub driver: String,

    pub status: RouteStatus,
    pub purchases: Vec<Purchase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    /// Ids de las compras que todavía no fueron entregadas
    pub fn undelivered_purchases(&self) -> Vec<PurchaseId> {
        self.purchases
            .iter()
            .filter(|purchase| !purchase.is_delivered())
            .map(|purchase| purchase.id)
            .collect()
    }

    pub fn has_purchase(&self, purchase_id: PurchaseId) -> bool {
        self.purchases.iter().any(|purchase| purchase.id == purchase_id)
    }
}

/// Datos que el cliente envía para crear o actualizar una ruta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteDraft {
    #[validate(length(min = 1, message = "route name is required and cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "vehicle information is required"))]
    pub vehicle: String,

    #[validate(length(min = 1, message = "driver information is required"))]
    pub driver: String,

    #[serde(default)]
    pub status: Option<RouteStatus>,
}

impl RouteDraft {
    pub fn new(name: impl Into<String>, vehicle: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vehicle: vehicle.into(),
            driver: driver.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: RouteStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<&Route> for RouteDraft {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            vehicle: route.vehicle.clone(),
            driver: route.driver.clone(),
            status: Some(route.status),
        }
    }
}
