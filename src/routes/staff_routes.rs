use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::staff_controller::StaffController;
use crate::dto::api_response::{ApiResponse, MessageResponse};
use crate::dto::staff_dto::{
    CreateStaffRequest, NextEmployeeNumberQuery, NextEmployeeNumberResponse, UpdateStaffRequest,
};
use crate::middleware::auth::auth_middleware;
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Cualquier usuario autenticado puede gestionar el personal
pub fn create_staff_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route("/next-employee-number", get(next_employee_number))
        .route("/:id", put(update_staff).delete(delete_staff))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_staff(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.list().await?)))
}

async fn next_employee_number(
    State(state): State<AppState>,
    Query(query): Query<NextEmployeeNumberQuery>,
) -> Result<Json<NextEmployeeNumberResponse>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let response = controller.next_employee_number(query.role.as_deref()).await?;
    Ok(Json(response))
}

async fn create_staff(
    State(state): State<AppState>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let controller = StaffController::new(state.pool.clone());
    let created = controller.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(created, "Staff created successfully")),
    ))
}

async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let updated = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Staff updated successfully")))
}

async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Staff deleted successfully")))
}
