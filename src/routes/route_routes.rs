use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::{
    ApiResponse, AssignPurchaseRequest, CreateRouteRequest, PurchaseResponse,
    RouteCreatedResponse, RouteResponse, StatusQuery, UpdatePurchaseStatusRequest,
    UpdateRouteRequest,
};
use crate::models::route::{PurchaseId, RouteId};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route).get(list_routes))
        .route("/:id", get(get_route).put(update_route))
        .route("/:id/purchases", post(assign_purchase))
        .route("/:id/purchases/:purchase_id", put(update_purchase_status))
        .route("/:id/complete", post(complete_route))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RouteCreatedResponse>>)> {
    let controller = RouteController::new(&state);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<Vec<RouteResponse>>> {
    let controller = RouteController::new(&state);
    let routes = controller.list(query.status).await?;
    Ok(Json(routes))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> AppResult<Json<RouteResponse>> {
    let controller = RouteController::new(&state);
    let route = controller.get(id).await?;
    Ok(Json(route))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(request): Json<UpdateRouteRequest>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    let controller = RouteController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn assign_purchase(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(request): Json<AssignPurchaseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RouteResponse>>)> {
    let controller = RouteController::new(&state);
    let response = controller.assign_purchase(id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_purchase_status(
    State(state): State<AppState>,
    Path((id, purchase_id)): Path<(RouteId, PurchaseId)>,
    Json(request): Json<UpdatePurchaseStatusRequest>,
) -> AppResult<Json<ApiResponse<PurchaseResponse>>> {
    let controller = RouteController::new(&state);
    let response = controller
        .update_purchase_status(id, purchase_id, request)
        .await?;
    Ok(Json(response))
}

async fn complete_route(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    let controller = RouteController::new(&state);
    let response = controller.complete(id).await?;
    Ok(Json(response))
}
