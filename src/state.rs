//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::RouteRepository;
use crate::services::notification_service::Notifier;
use crate::services::route_service::RouteService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub routes: RouteService,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        repository: Arc<dyn RouteRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            routes: RouteService::new(repository),
            notifier,
        }
    }
}
