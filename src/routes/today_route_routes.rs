use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::today_route_controller::{TodayRouteController, NO_ASSIGNMENT};
use crate::dto::api_response::ApiResponse;
use crate::dto::fitness_dto::LimitQuery;
use crate::dto::today_route_dto::{
    BusHistoryQuery, Dashboard, FitnessCheckView, FuelSummaryQuery, OdometerToday, QuickStats,
    SubmitFitnessRequest, SubmitFuelRequest, SubmitOdometerRequest, TodayAssignment, TodayQuery,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, DRIVER_DESK};
use crate::models::fuel::FuelEntry;
use crate::models::odometer::{DailyDistance, OdometerReading};
use crate::repositories::fuel_entry_repository::FuelCostSummary;
use crate::services::fuel_efficiency_service::FillUpReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

type Response<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn create_today_route_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/stats", get(quick_stats))
        .route("/assignment", get(today_assignment))
        .route("/assignments/active", get(active_assignments))
        .route("/fitness", get(fitness_check).post(submit_fitness))
        .route("/fitness/history", get(fitness_history))
        .route("/odometer", get(odometer_today).post(submit_odometer))
        .route("/odometer/history", get(odometer_history))
        .route("/fuel", get(fuel_entries).post(submit_fuel))
        .route("/fuel/efficiency", get(efficiency_report))
        .route("/fuel/summary", get(fuel_summary))
        .route("/driver-fuel-history", get(driver_fuel_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

// Conductores y administradores
fn controller_for(state: &AppState, user: &AuthenticatedUser) -> Result<TodayRouteController, AppError> {
    user.authorize(DRIVER_DESK)?;
    Ok(TodayRouteController::new(state.pool.clone()))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TodayQuery>,
) -> Response<Dashboard> {
    let controller = controller_for(&state, &user)?;
    tracing::info!("🚌 Panel del día para el conductor {}", user.user_id);
    Ok(Json(ApiResponse::success(controller.dashboard(user.user_id, query.date).await?)))
}

async fn quick_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TodayQuery>,
) -> Response<Option<QuickStats>> {
    let controller = controller_for(&state, &user)?;
    match controller.quick_stats(user.user_id, query.date).await? {
        Some(stats) => Ok(Json(ApiResponse::success(Some(stats)))),
        None => Ok(Json(ApiResponse::empty(NO_ASSIGNMENT))),
    }
}

async fn today_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TodayQuery>,
) -> Response<Option<TodayAssignment>> {
    let controller = controller_for(&state, &user)?;
    match controller.today_assignment(user.user_id, query.date).await? {
        Some(assignment) => Ok(Json(ApiResponse::success(Some(assignment)))),
        None => Ok(Json(ApiResponse::empty("No active assignment found for today"))),
    }
}

async fn active_assignments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response<Vec<TodayAssignment>> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(controller.active_assignments(user.user_id).await?)))
}

async fn fitness_check(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TodayQuery>,
) -> Response<Option<FitnessCheckView>> {
    let controller = controller_for(&state, &user)?;
    let assignment_id = controller
        .assignment_id_for(user.user_id, query.date, query.assignment_id)
        .await?;
    let Some(assignment_id) = assignment_id else {
        return Ok(Json(ApiResponse::empty(NO_ASSIGNMENT)));
    };
    Ok(Json(ApiResponse::success(
        controller.fitness_check(assignment_id, query.date).await?,
    )))
}

async fn submit_fitness(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SubmitFitnessRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FitnessCheckView>>), AppError> {
    let controller = controller_for(&state, &user)?;
    let check = controller.submit_fitness(user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(check, "Fitness check submitted successfully")),
    ))
}

async fn fitness_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BusHistoryQuery>,
) -> Response<Vec<FitnessCheckView>> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller.fitness_history(query.bus_id, query.limit).await?,
    )))
}

async fn odometer_today(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TodayQuery>,
) -> Response<OdometerToday> {
    let controller = controller_for(&state, &user)?;
    let odometer = controller
        .odometer_today(user.user_id, query.date, query.assignment_id)
        .await?;
    Ok(Json(ApiResponse::success(odometer)))
}

async fn submit_odometer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SubmitOdometerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OdometerReading>>), AppError> {
    let controller = controller_for(&state, &user)?;
    let reading = controller.submit_odometer(user.user_id, request).await?;
    let message = format!(
        "{} odometer reading submitted successfully",
        reading.reading_type.label()
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(reading, message)),
    ))
}

async fn odometer_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BusHistoryQuery>,
) -> Response<Vec<DailyDistance>> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller.odometer_history(query.bus_id, query.days).await?,
    )))
}

async fn fuel_entries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BusHistoryQuery>,
) -> Response<Vec<FuelEntry>> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller.fuel_entries(user.user_id, query.bus_id, query.limit).await?,
    )))
}

async fn submit_fuel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SubmitFuelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelEntry>>), AppError> {
    let controller = controller_for(&state, &user)?;
    let entry = controller.submit_fuel(user.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(entry, "Fuel entry recorded successfully")),
    ))
}

async fn efficiency_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BusHistoryQuery>,
) -> Response<FillUpReport> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller
            .efficiency_report(user.user_id, query.bus_id, query.limit)
            .await?,
    )))
}

async fn fuel_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<FuelSummaryQuery>,
) -> Response<FuelCostSummary> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller
            .fuel_summary(query.bus_id, query.start_date, query.end_date)
            .await?,
    )))
}

async fn driver_fuel_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<LimitQuery>,
) -> Response<Vec<FuelEntry>> {
    let controller = controller_for(&state, &user)?;
    Ok(Json(ApiResponse::success(
        controller.driver_fuel_history(user.user_id, query.limit).await?,
    )))
}
