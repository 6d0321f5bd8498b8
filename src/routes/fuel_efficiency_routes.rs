use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::fuel_efficiency_controller::{ensure_own_reports, FuelEfficiencyController};
use crate::dto::api_response::RangedResponse;
use crate::dto::fuel_efficiency_dto::{
    BusEfficiency, BusFullReport, BusOperated, DriverEfficiency, DriverFullReport,
    EfficiencyAlert, FuelEntryEfficiency, LeaderboardEntry, RangeQuery,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ALL_ROLES, BACK_OFFICE};
use crate::services::fuel_efficiency_service::FuelRange;
use crate::state::AppState;
use crate::utils::errors::AppError;

type Ranged<T> = Result<Json<RangedResponse<T>>, AppError>;

pub fn create_fuel_efficiency_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/buses", get(list_buses))
        .route("/buses/:bus_id", get(get_bus))
        .route("/bus/:bus_id/full-report", get(bus_full_report))
        .route("/drivers", get(list_drivers))
        .route("/drivers/:driver_id", get(get_driver))
        .route("/driver/:driver_id/full-report", get(driver_full_report))
        .route("/driver/:driver_id/buses-operated", get(buses_operated))
        .route("/driver/:driver_id/fuel-entries", get(driver_fuel_entries))
        .route("/leaderboard", get(leaderboard))
        .route("/alerts", get(alerts))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn month_range(query: &RangeQuery) -> FuelRange {
    FuelRange::parse(query.range.as_deref(), FuelRange::Month)
}

// Reportes de un conductor: back office o el propio conductor
fn driver_controller(
    state: &AppState,
    user: &AuthenticatedUser,
    driver_id: i32,
) -> Result<FuelEfficiencyController, AppError> {
    user.authorize(ALL_ROLES)?;
    ensure_own_reports(user, driver_id)?;
    Ok(FuelEfficiencyController::new(state.pool.clone()))
}

async fn list_buses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<BusEfficiency>> {
    user.authorize(BACK_OFFICE)?;
    let range = month_range(&query);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    Ok(Json(RangedResponse::list(controller.buses(range).await?, range.as_str())))
}

async fn get_bus(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(bus_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<BusEfficiency> {
    user.authorize(BACK_OFFICE)?;
    let range = month_range(&query);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    Ok(Json(RangedResponse::new(controller.bus(bus_id, range).await?, range.as_str())))
}

async fn bus_full_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(bus_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<BusFullReport> {
    user.authorize(BACK_OFFICE)?;
    let range = month_range(&query);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    tracing::info!("📊 Reporte completo de combustible del bus {}", bus_id);
    Ok(Json(RangedResponse::new(
        controller.bus_full_report(bus_id, range).await?,
        range.as_str(),
    )))
}

async fn list_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<DriverEfficiency>> {
    user.authorize(BACK_OFFICE)?;
    let range = month_range(&query);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    Ok(Json(RangedResponse::list(controller.drivers(range).await?, range.as_str())))
}

async fn get_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(driver_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<DriverEfficiency> {
    let controller = driver_controller(&state, &user, driver_id)?;
    let range = month_range(&query);
    Ok(Json(RangedResponse::new(controller.driver(driver_id, range).await?, range.as_str())))
}

async fn driver_full_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(driver_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<DriverFullReport> {
    let controller = driver_controller(&state, &user, driver_id)?;
    let range = month_range(&query);
    tracing::info!("📊 Reporte completo de combustible del conductor {}", driver_id);
    Ok(Json(RangedResponse::new(
        controller.driver_full_report(driver_id, range).await?,
        range.as_str(),
    )))
}

async fn buses_operated(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(driver_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<BusOperated>> {
    let controller = driver_controller(&state, &user, driver_id)?;
    let range = month_range(&query);
    Ok(Json(RangedResponse::list(
        controller.buses_operated(driver_id, range).await?,
        range.as_str(),
    )))
}

async fn driver_fuel_entries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(driver_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<FuelEntryEfficiency>> {
    let controller = driver_controller(&state, &user, driver_id)?;
    let range = month_range(&query);
    Ok(Json(RangedResponse::list(
        controller.fuel_entries(driver_id, range).await?,
        range.as_str(),
    )))
}

async fn leaderboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<LeaderboardEntry>> {
    user.authorize(ALL_ROLES)?;
    let range = month_range(&query);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    Ok(Json(RangedResponse::list(
        controller.leaderboard(range, query.limit).await?,
        range.as_str(),
    )))
}

async fn alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RangeQuery>,
) -> Ranged<Vec<EfficiencyAlert>> {
    user.authorize(BACK_OFFICE)?;
    let range = FuelRange::parse(query.range.as_deref(), FuelRange::Week);
    let controller = FuelEfficiencyController::new(state.pool.clone());
    Ok(Json(RangedResponse::list(controller.alerts(range).await?, range.as_str())))
}
