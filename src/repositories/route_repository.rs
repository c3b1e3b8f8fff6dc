//! Repositorio de rutas en memoria
//!
//! Guarda las rutas durante la vida del proceso. Un único `RwLock` protege
//! el mapa y el contador de ids, así que ninguna lectura observa una ruta a
//! medio actualizar y dos `create` concurrentes nunca reciben el mismo id.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use validator::Validate;

use super::{RouteRepository, StoreError};
use crate::models::route::{Purchase, Route, RouteId, RouteStatus};

#[derive(Debug)]
struct RouteTable {
    routes: BTreeMap<RouteId, Route>,
    next_id: RouteId,
}

#[derive(Debug)]
pub struct InMemoryRouteRepository {
    table: RwLock<RouteTable>,
}

impl InMemoryRouteRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RouteTable {
                routes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryRouteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteRepository for InMemoryRouteRepository {
    async fn create(&self, mut route: Route) -> Result<RouteId, StoreError> {
        route.validate()?;

        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;

        route.id = id;
        table.routes.insert(id, route);
        debug!(route_id = id, "Route stored");

        Ok(id)
    }

    async fn get_by_id(&self, id: RouteId) -> Result<Route, StoreError> {
        let table = self.table.read().await;
        table.routes.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: RouteId, mut route: Route) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let slot = table.routes.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        route.validate()?;
        route.id = id;
        *slot = route;
        debug!(route_id = id, "Route replaced");

        Ok(())
    }

    async fn delete(&self, id: RouteId) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        table.routes.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!(route_id = id, "Route deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Route>, StoreError> {
        let table = self.table.read().await;
        Ok(table.routes.values().cloned().collect())
    }

    async fn find_by_status(&self, status: RouteStatus) -> Result<Vec<Route>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .routes
            .values()
            .filter(|route| route.status == status)
            .cloned()
            .collect())
    }

    async fn assign_purchase(&self, route_id: RouteId, purchase: Purchase) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let route = table
            .routes
            .get_mut(&route_id)
            .ok_or(StoreError::NotFound(route_id))?;

        if route.has_purchase(purchase.id) {
            return Err(StoreError::Conflict {
                route_id,
                purchase_id: purchase.id,
            });
        }

        debug!(route_id, purchase_id = purchase.id, "Purchase appended to route");
        route.purchases.push(purchase);
        Ok(())
    }
}
