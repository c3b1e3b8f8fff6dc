use std::sync::Arc;

use tracing::{info, warn};

use crate::dto::{
    ApiResponse, AssignPurchaseRequest, CreateRouteRequest, PurchaseResponse,
    RouteCreatedResponse, RouteResponse, UpdatePurchaseStatusRequest, UpdateRouteRequest,
};
use crate::models::route::{PurchaseId, RouteDraft, RouteId, RouteStatus, DELIVERED, FAILED};
use crate::services::notification_service::{Notification, NotificationKind, Notifier};
use crate::services::route_service::RouteService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};

pub struct RouteController {
    service: RouteService,
    notifier: Arc<dyn Notifier>,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: state.routes.clone(),
            notifier: state.notifier.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> AppResult<ApiResponse<RouteCreatedResponse>> {
        let id = self.service.create_route(RouteDraft::from(request)).await?;
        info!("✅ Ruta creada: {}", id);
        Ok(ApiResponse::success_with_message(
            RouteCreatedResponse { id },
            "route created",
        ))
    }

    pub async fn get(&self, id: RouteId) -> AppResult<RouteResponse> {
        let route = self.service.get_route(id).await?;
        Ok(RouteResponse::from(route))
    }

    /// Listar rutas; filtro vacío o ausente devuelve todas
    pub async fn list(&self, status: Option<String>) -> AppResult<Vec<RouteResponse>> {
        let status = parse_status_filter(status.as_deref())?;
        let routes = self.service.get_routes_by_status(status).await?;
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: RouteId,
        request: UpdateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        self.service.update_route(id, RouteDraft::from(request)).await?;
        let route = self.service.get_route(id).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "route updated",
        ))
    }

    pub async fn assign_purchase(
        &self,
        route_id: RouteId,
        request: AssignPurchaseRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let purchase = request.to_purchase();
        self.service
            .assign_purchase_to_route(route_id, purchase)
            .await?;

        if let Some(recipient) = request.recipient {
            self.dispatch(Notification::new(
                NotificationKind::PurchaseInRoute,
                request.id,
                request.description,
                recipient,
            ));
        }

        let route = self.service.get_route(route_id).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "purchase assigned",
        ))
    }

    pub async fn update_purchase_status(
        &self,
        route_id: RouteId,
        purchase_id: PurchaseId,
        request: UpdatePurchaseStatusRequest,
    ) -> AppResult<ApiResponse<PurchaseResponse>> {
        if request.status.is_empty() {
            return Err(bad_request_error("purchase status cannot be empty"));
        }

        let purchase = self
            .service
            .update_purchase_status(route_id, purchase_id, request.status)
            .await?;

        if let (Some(recipient), Some(kind)) =
            (request.recipient, delivery_notification_kind(&purchase.status))
        {
            self.dispatch(Notification::new(
                kind,
                purchase_id,
                purchase.description.clone(),
                recipient,
            ));
        }

        Ok(ApiResponse::success_with_message(
            PurchaseResponse::from(purchase),
            "purchase status updated",
        ))
    }

    pub async fn complete(&self, route_id: RouteId) -> AppResult<ApiResponse<RouteResponse>> {
        self.service.complete_route(route_id).await?;
        let route = self.service.get_route(route_id).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "route completed",
        ))
    }

    /// Enviar la notificación en segundo plano; los fallos solo se registran
    fn dispatch(&self, notification: Notification) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let kind = notification.kind;
            let purchase_id = notification.purchase_id;
            if let Err(e) = notifier.notify(notification).await {
                warn!("⚠️ Notificación {} de la compra {} falló: {}", kind, purchase_id, e);
            }
        });
    }
}

fn parse_status_filter(status: Option<&str>) -> AppResult<Option<RouteStatus>> {
    match status.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<RouteStatus>()
            .map(Some)
            .map_err(|e| bad_request_error(&e.to_string())),
    }
}

fn delivery_notification_kind(status: &str) -> Option<NotificationKind> {
    match status {
        DELIVERED => Some(NotificationKind::PurchaseDelivered),
        FAILED => Some(NotificationKind::PurchaseFailed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::EnvironmentConfig;
    use crate::repositories::InMemoryRouteRepository;
    use crate::services::notification_service::NotificationError;
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ChannelNotifier {
        sender: mpsc::UnboundedSender<Notification>,
    }

    #[async_trait]
    impl Notifier for ChannelNotifier {
        async fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
            let _ = self.sender.send(notification);
            Ok(())
        }
    }

    fn controller() -> (RouteController, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let state = AppState::new(
            EnvironmentConfig::default(),
            Arc::new(InMemoryRouteRepository::new()),
            Arc::new(ChannelNotifier { sender }),
        );
        (RouteController::new(&state), receiver)
    }

    fn create_request() -> CreateRouteRequest {
        CreateRouteRequest {
            name: "Ruta Norte".to_string(),
            vehicle: "Van 12".to_string(),
            driver: "Marta".to_string(),
        }
    }

    fn assign_request(id: PurchaseId, recipient: Option<&str>) -> AssignPurchaseRequest {
        AssignPurchaseRequest {
            id,
            description: format!("Paquete {id}"),
            status: "PENDING".to_string(),
            recipient: recipient.map(str::to_string),
        }
    }

    async fn next_notification(receiver: &mut mpsc::UnboundedReceiver<Notification>) -> Notification {
        tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .expect("notification was not dispatched")
            .expect("notifier dropped")
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("COMPLETED")).unwrap(),
            Some(RouteStatus::Completed)
        );
        assert!(matches!(
            parse_status_filter(Some("DONE")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_with_recipient_sends_in_route_notification() {
        let (controller, mut receiver) = controller();
        let id = controller.create(create_request()).await.unwrap().data.unwrap().id;

        let response = controller
            .assign_purchase(id, assign_request(7, Some("cliente@example.com")))
            .await
            .unwrap();
        assert_eq!(response.data.unwrap().status, RouteStatus::InProgress);

        let notification = next_notification(&mut receiver).await;
        assert_eq!(notification.kind, NotificationKind::PurchaseInRoute);
        assert_eq!(notification.purchase_id, 7);
        assert_eq!(notification.recipient, "cliente@example.com");
    }

    #[tokio::test]
    async fn test_assign_without_recipient_sends_nothing() {
        let (controller, mut receiver) = controller();
        let id = controller.create(create_request()).await.unwrap().data.unwrap().id;

        controller.assign_purchase(id, assign_request(1, None)).await.unwrap();
        drop(controller);

        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_purchase_status_update_notifies_delivery_outcome() {
        let (controller, mut receiver) = controller();
        let id = controller.create(create_request()).await.unwrap().data.unwrap().id;
        controller.assign_purchase(id, assign_request(1, None)).await.unwrap();
        controller.assign_purchase(id, assign_request(2, None)).await.unwrap();

        controller
            .update_purchase_status(
                id,
                1,
                UpdatePurchaseStatusRequest {
                    status: DELIVERED.to_string(),
                    recipient: Some("a@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            next_notification(&mut receiver).await.kind,
            NotificationKind::PurchaseDelivered
        );

        controller
            .update_purchase_status(
                id,
                2,
                UpdatePurchaseStatusRequest {
                    status: FAILED.to_string(),
                    recipient: Some("b@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        let notification = next_notification(&mut receiver).await;
        assert_eq!(notification.kind, NotificationKind::PurchaseFailed);
        assert_eq!(notification.purchase_id, 2);
    }

    #[tokio::test]
    async fn test_failed_assignment_sends_no_notification() {
        let (controller, mut receiver) = controller();

        let err = controller
            .assign_purchase(99, assign_request(1, Some("c@example.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        drop(controller);

        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_purchase_status_is_rejected() {
        let (controller, _receiver) = controller();
        let id = controller.create(create_request()).await.unwrap().data.unwrap().id;
        controller.assign_purchase(id, assign_request(1, None)).await.unwrap();

        let err = controller
            .update_purchase_status(
                id,
                1,
                UpdatePurchaseStatusRequest {
                    status: String::new(),
                    recipient: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
