use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::fitness_controller::FitnessController;
use crate::dto::api_response::{ApiResponse, MessageResponse};
use crate::dto::fitness_dto::{
    AssignmentStatusList, BusFitnessHistory, BusFitnessRecords, BusStatusList, CreateFitnessRequest,
    DateQuery, DateRangeQuery, FitnessDayRecords, FitnessListQuery, FitnessPage, LimitQuery,
    UpdateFitnessRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ADMIN_ONLY, BACK_OFFICE};
use crate::models::fitness::{BusFitness, FitnessSummary};
use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Las rutas fijas se registran antes de `/:id`
pub fn create_fitness_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/date/:date", get(records_by_date))
        .route("/bus/:bus_id", get(records_by_bus))
        .route("/bus/:bus_id/history", get(bus_history))
        .route("/status/:date", get(bus_status))
        .route("/today-assignments", get(today_assignments))
        .route("/stats/summary", get(summary))
        .route("/alerts/critical", get(critical_alerts))
        .route("/:id", get(get_record).put(update_record).delete(delete_record))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<FitnessListQuery>,
) -> Result<Json<FitnessPage>, AppError> {
    user.authorize(BACK_OFFICE)?;
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn records_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<FitnessDayRecords>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.by_date(&date).await?))
}

async fn records_by_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<BusFitnessRecords>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.by_bus(bus_id, range).await?))
}

async fn bus_history(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<BusFitnessHistory>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.bus_history(bus_id, query.limit).await?))
}

async fn bus_status(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<BusStatusList>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.bus_status(&date).await?))
}

async fn today_assignments(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AssignmentStatusList>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.assignments_with_status(query.date).await?))
}

async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<FitnessSummary>>, AppError> {
    user.authorize(BACK_OFFICE)?;
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.summary(range).await?)))
}

async fn critical_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<FitnessDayRecords>, AppError> {
    user.authorize(BACK_OFFICE)?;
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(controller.critical_alerts(query.date).await?))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BusFitness>>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.get_by_id(id).await?)))
}

async fn create_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFitnessRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BusFitness>>), AppError> {
    user.authorize(&[Role::Driver])?;
    let controller = FitnessController::new(state.pool.clone());
    let record = controller.create(user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(record, "Fitness check submitted successfully")),
    ))
}

async fn update_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateFitnessRequest>,
) -> Result<Json<ApiResponse<BusFitness>>, AppError> {
    let controller = FitnessController::new(state.pool.clone());
    let record = controller.update(id, &user, request).await?;
    Ok(Json(ApiResponse::success_with_message(record, "Fitness check updated successfully")))
}

async fn delete_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = FitnessController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Fitness check deleted successfully")))
}
