use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::route::{Purchase, PurchaseId, Route, RouteDraft, RouteId, RouteStatus};

// Request para crear una ruta
#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    pub name: String,
    pub vehicle: String,
    pub driver: String,
}

impl From<CreateRouteRequest> for RouteDraft {
    fn from(request: CreateRouteRequest) -> Self {
        RouteDraft::new(request.name, request.vehicle, request.driver)
    }
}

// Request para actualizar una ruta; el estado es opcional
#[derive(Debug, Deserialize)]
pub struct UpdateRouteRequest {
    pub name: String,
    pub vehicle: String,
    pub driver: String,
    #[serde(default)]
    pub status: Option<RouteStatus>,
}

impl From<UpdateRouteRequest> for RouteDraft {
    fn from(request: UpdateRouteRequest) -> Self {
        RouteDraft {
            name: request.name,
            vehicle: request.vehicle,
            driver: request.driver,
            status: request.status,
        }
    }
}

fn default_purchase_status() -> String {
    "PENDING".to_string()
}

// Request para asignar una compra a una ruta
#[derive(Debug, Deserialize)]
pub struct AssignPurchaseRequest {
    pub id: PurchaseId,
    pub description: String,
    #[serde(default = "default_purchase_status")]
    pub status: String,
    /// Destinatario de la notificación IN_ROUTE, si se quiere avisar
    #[serde(default)]
    pub recipient: Option<String>,
}

impl AssignPurchaseRequest {
    pub fn to_purchase(&self) -> Purchase {
        Purchase::new(self.id, self.description.clone(), self.status.clone())
    }
}

// Request para cambiar el estado de una compra
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseStatusRequest {
    pub status: String,
    #[serde(default)]
    pub recipient: Option<String>,
}

// Filtro de listado: GET /routes?status=PENDING
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

// Response de compra
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PurchaseResponse {
    pub id: PurchaseId,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            description: purchase.description,
            status: purchase.status,
            created_at: purchase.created_at,
        }
    }
}

// Response de ruta con sus compras
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub id: RouteId,
    pub name: String,
    pub vehicle: String,
    pub driver: String,
    pub status: RouteStatus,
    pub purchases: Vec<PurchaseResponse>,
    pub pending_purchases: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        let pending_purchases = route.undelivered_purchases().len();
        Self {
            id: route.id,
            name: route.name,
            vehicle: route.vehicle,
            driver: route.driver,
            status: route.status,
            purchases: route.purchases.into_iter().map(PurchaseResponse::from).collect(),
            pending_purchases,
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteCreatedResponse {
    pub id: RouteId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_request_defaults_status_to_pending() {
        let request: AssignPurchaseRequest =
            serde_json::from_str(r#"{"id": 10, "description": "Caja grande"}"#).unwrap();
        assert_eq!(request.status, "PENDING");
        assert!(request.recipient.is_none());

        let purchase = request.to_purchase();
        assert_eq!(purchase.id, 10);
        assert!(!purchase.is_delivered());
    }

    #[test]
    fn test_update_request_without_status_keeps_it_empty() {
        let request: UpdateRouteRequest =
            serde_json::from_str(r#"{"name": "Norte", "vehicle": "Van 3", "driver": "Ana"}"#).unwrap();
        let draft = RouteDraft::from(request);
        assert!(draft.status.is_none());

        let request: UpdateRouteRequest = serde_json::from_str(
            r#"{"name": "Norte", "vehicle": "Van 3", "driver": "Ana", "status": "IN_PROGRESS"}"#,
        )
        .unwrap();
        assert_eq!(RouteDraft::from(request).status, Some(RouteStatus::InProgress));
    }

    #[test]
    fn test_route_response_counts_pending_purchases() {
        let now = Utc::now();
        let route = Route {
            id: 1,
            name: "Centro".to_string(),
            vehicle: "Moto".to_string(),
            driver: "Luis".to_string(),
            status: RouteStatus::InProgress,
            purchases: vec![
                Purchase::new(1, "Sobre", "DELIVERED"),
                Purchase::new(2, "Paquete", "PENDING"),
            ],
            created_at: now,
            updated_at: now,
        };

        let response = RouteResponse::from(route);
        assert_eq!(response.pending_purchases, 1);
        assert_eq!(response.purchases.len(), 2);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "IN_PROGRESS");
    }
}
