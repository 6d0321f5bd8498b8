use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::spare_part_controller::SparePartController;
use crate::dto::api_response::{ApiResponse, MessageResponse};
use crate::dto::spare_part_dto::{
    CreateSparePartRequest, InstallSparePartRequest, InstallationFilters, LatestOdometer,
    MaintenanceLogFilters, PartStatus, ReplacementResult, UpdateInstallationRequest,
    UpdateSparePartRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ADMIN_ONLY};
use crate::models::spare_part::{MaintenanceLog, SparePart, VehicleSparePart};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Las rutas `/vehicle/...` fijas van antes de `/vehicle/:id` y de `/:id`
pub fn create_spare_part_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/vehicle", post(install_part))
        .route("/vehicle/all", get(list_installations))
        .route("/vehicle/alerts/replacement", get(replacement_alerts))
        .route("/vehicle/bus/:bus_id/status", get(bus_status))
        .route("/vehicle/:id/replace", post(replace_part))
        .route(
            "/vehicle/:id",
            get(get_installation)
                .put(update_installation)
                .delete(delete_installation),
        )
        .route("/maintenance-logs", get(maintenance_logs))
        .route("/odometer/bus/:bus_id/latest", get(latest_odometer))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_parts(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<SparePart>>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.list_parts().await?)))
}

async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SparePart>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_part(id).await?)))
}

async fn create_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSparePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SparePart>>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    let part = controller.create_part(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(part, "Spare part created successfully")),
    ))
}

async fn update_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateSparePartRequest>,
) -> Result<Json<ApiResponse<SparePart>>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    let part = controller.update_part(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(part, "Spare part updated successfully")))
}

async fn delete_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    controller.delete_part(id).await?;
    Ok(Json(MessageResponse::new("Spare part deleted successfully")))
}

async fn list_installations(
    State(state): State<AppState>,
    Query(filters): Query<InstallationFilters>,
) -> Result<Json<ApiResponse<Vec<VehicleSparePart>>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.list_installations(filters).await?)))
}

async fn get_installation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VehicleSparePart>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_installation(id).await?)))
}

async fn install_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<InstallSparePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleSparePart>>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    let installation = controller.install(user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(installation, "Spare part installed successfully")),
    ))
}

async fn update_installation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateInstallationRequest>,
) -> Result<Json<ApiResponse<VehicleSparePart>>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    let installation = controller.update_installation(id, user.user_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        installation,
        "Spare part installation updated successfully",
    )))
}

async fn delete_installation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    controller.delete_installation(id).await?;
    Ok(Json(MessageResponse::new("Spare part installation deleted successfully")))
}

async fn replace_part(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<InstallSparePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReplacementResult>>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = SparePartController::new(state.pool.clone());
    let result = controller.replace(id, user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(result, "Spare part replaced successfully")),
    ))
}

async fn replacement_alerts(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<PartStatus>>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.replacement_alerts().await?)))
}

async fn bus_status(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<PartStatus>>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.bus_status(bus_id).await?)))
}

async fn maintenance_logs(
    State(state): State<AppState>,
    Query(filters): Query<MaintenanceLogFilters>,
) -> Result<Json<ApiResponse<Vec<MaintenanceLog>>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.maintenance_logs(filters.bus_id).await?)))
}

async fn latest_odometer(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
) -> Result<Json<ApiResponse<LatestOdometer>>, AppError> {
    let controller = SparePartController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.latest_odometer(bus_id).await?)))
}
