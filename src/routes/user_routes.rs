use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser, ADMIN_ONLY};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).patch(update_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = UserController::new(state.pool.clone());
    let created = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    user.authorize(ADMIN_ONLY)?;
    let controller = UserController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}
