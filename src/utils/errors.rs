//! Sistema de manejo de errores
//!
//! Este módulo define los errores que llegan a la capa HTTP
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::models::route::PurchaseId;
use crate::repositories::StoreError;
use crate::services::route_service::RouteError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Incomplete delivery: {message}")]
    IncompleteDelivery {
        message: String,
        pending: Vec<PurchaseId>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        let message = err.to_string();
        match err {
            RouteError::Validation(errors) => AppError::Validation(errors),
            RouteError::InvalidState { .. } => AppError::InvalidState(message),
            RouteError::IncompleteDelivery { pending, .. } => {
                AppError::IncompleteDelivery { message, pending }
            }
            RouteError::PurchaseNotFound { .. } => AppError::NotFound(message),
            RouteError::Store { source, .. } => match source {
                StoreError::NotFound(_) => AppError::NotFound(message),
                StoreError::Validation(errors) => AppError::Validation(errors),
                StoreError::Conflict { .. } => AppError::Conflict(message),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
                )
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Conflict", msg, "CONFLICT"),
                )
            }

            AppError::InvalidState(msg) => {
                warn!("Invalid state: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Invalid State", msg, "INVALID_STATE"),
                )
            }

            AppError::IncompleteDelivery { message, pending } => {
                warn!("Incomplete delivery: {}", message);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new("Incomplete Delivery", message, "INCOMPLETE_DELIVERY")
                        .with_details(json!({ "pending_purchases": pending })),
                )
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::RouteStatus;

    #[test]
    fn test_route_errors_map_to_http_statuses() {
        let cases = [
            (
                AppError::from(RouteError::InvalidState {
                    operation: "assign purchase to",
                    route_id: 1,
                    status: RouteStatus::Completed,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(RouteError::IncompleteDelivery {
                    route_id: 1,
                    pending: vec![2],
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(RouteError::PurchaseNotFound {
                    route_id: 1,
                    purchase_id: 2,
                }),
                StatusCode::NOT_FOUND,
            ),
            (bad_request_error("invalid route status 'X'"), StatusCode::BAD_REQUEST),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_conflict_message_keeps_route_context() {
        let error = AppError::from(RouteError::Store {
            operation: "assign purchase to route",
            route_id: Some(4),
            source: StoreError::Conflict {
                route_id: 4,
                purchase_id: 7,
            },
        });

        match error {
            AppError::Conflict(message) => {
                assert!(message.contains("route 4"));
                assert!(message.contains("purchase 7"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_every_route_error_is_a_client_error() {
        let errors = vec![
            RouteError::Validation(validator::ValidationErrors::new()),
            RouteError::InvalidState {
                operation: "complete",
                route_id: 1,
                status: RouteStatus::Cancelled,
            },
            RouteError::IncompleteDelivery {
                route_id: 1,
                pending: vec![3],
            },
            RouteError::PurchaseNotFound {
                route_id: 1,
                purchase_id: 3,
            },
            RouteError::Store {
                operation: "load route",
                route_id: Some(1),
                source: StoreError::NotFound(1),
            },
        ];

        for error in errors {
            let status = AppError::from(error).into_response().status();
            assert!(status.is_client_error(), "unexpected status {status}");
        }
    }
}
