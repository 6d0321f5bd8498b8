use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::bus_controller::BusController;
use crate::dto::api_response::MessageResponse;
use crate::dto::bus_dto::{CreateBusRequest, UpdateBusRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ADMIN_ONLY, BACK_OFFICE};
use crate::models::bus::Bus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bus_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_buses).post(create_bus))
        .route("/:id", get(get_bus).put(update_bus).delete(delete_bus))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_buses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Bus>>, AppError> {
    user.authorize(BACK_OFFICE)?;
    let controller = BusController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Bus>, AppError> {
    let controller = BusController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_bus(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBusRequest>,
) -> Result<(StatusCode, Json<Bus>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = BusController::new(state.pool.clone());
    let bus = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(bus)))
}

async fn update_bus(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBusRequest>,
) -> Result<Json<Bus>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = BusController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_bus(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = BusController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Bus deleted successfully")))
}
