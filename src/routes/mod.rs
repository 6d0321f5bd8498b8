//! Routers de la API
//!
//! Cada recurso expone `create_X_router(state)` y se monta bajo `/api`.

pub mod assignment_routes;
pub mod auth_routes;
pub mod bus_routes;
pub mod fitness_routes;
pub mod fuel_efficiency_routes;
pub mod spare_part_routes;
pub mod staff_routes;
pub mod today_route_routes;
pub mod user_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Aplicación completa con CORS, trazas y estado
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&state.config.cors_origins)
    };

    let api = Router::new()
        .route("/", get(api_status))
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/users", user_routes::create_user_router(state.clone()))
        .nest("/staff", staff_routes::create_staff_router(state.clone()))
        .nest("/bus", bus_routes::create_bus_router(state.clone()))
        .nest("/assignments", assignment_routes::create_assignment_router(state.clone()))
        .nest("/bus-fitness", fitness_routes::create_fitness_router(state.clone()))
        .nest("/driver/today-route", today_route_routes::create_today_route_router(state.clone()))
        .nest("/spare-part", spare_part_routes::create_spare_part_router(state.clone()))
        .nest(
            "/fuel-efficiency",
            fuel_efficiency_routes::create_fuel_efficiency_router(state.clone()),
        );

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "name": "FleetMadox API", "status": "ok" }))
}

async fn api_status() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "FleetMadox API running successfully!"
    }))
}
