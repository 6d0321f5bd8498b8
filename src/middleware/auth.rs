//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y la autorización por listas estáticas de roles.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    models::user::Role,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Solo administradores
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
/// Administradores y contadores
pub const BACK_OFFICE: &[Role] = &[Role::Admin, Role::Accountant];
/// Cualquier rol
pub const ALL_ROLES: &[Role] = &[Role::Admin, Role::Accountant, Role::Driver];
/// Conductores (y administradores actuando en su nombre)
pub const DRIVER_DESK: &[Role] = &[Role::Driver, Role::Admin];

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Verificar que el rol del usuario está en la lista permitida
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Forbidden".to_string()))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(extract_token_from_header)
        .ok_or_else(|| AppError::Unauthorized("Missing token".to_string()))?;

    let claims = verify_token(token, &state.jwt_config())?;

    tracing::debug!("🔐 Usuario {} autenticado como {}", claims.sub, claims.role);

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_against_role_lists() {
        let accountant = AuthenticatedUser {
            user_id: 7,
            role: Role::Accountant,
        };
        assert!(accountant.authorize(BACK_OFFICE).is_ok());
        assert!(accountant.authorize(ALL_ROLES).is_ok());
        assert!(matches!(
            accountant.authorize(ADMIN_ONLY),
            Err(AppError::Forbidden(_))
        ));
        assert!(accountant.authorize(DRIVER_DESK).is_err());
        assert!(!accountant.is_admin());
    }
}
