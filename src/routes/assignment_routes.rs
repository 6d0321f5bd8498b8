use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ADMIN_ONLY, ALL_ROLES};
use crate::models::assignment::Assignment;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assignment_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route(
            "/:id",
            get(get_assignment)
                .patch(update_assignment)
                .delete(delete_assignment),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_assignments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AssignmentListQuery>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    user.authorize(ALL_ROLES)?;
    let controller = AssignmentController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<Assignment>, AppError> {
    user.authorize(ALL_ROLES)?;
    let controller = AssignmentController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = AssignmentController::new(state.pool.clone());
    let assignment = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn update_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = AssignmentController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = AssignmentController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
