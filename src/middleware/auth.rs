//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de roles. La existencia y el estado del conductor
//! se comprueban después, en el núcleo.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    models::driver::DriverRole,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: DriverRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == DriverRole::Admin
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)
        .map_err(|_| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let claims = verify_token(token, &JwtConfig::from(state.config.as_ref()))
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    let role = DriverRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("Rol desconocido en el token".to_string()))?;

    let email = claims.sub.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Unauthorized("Token sin identidad".to_string()));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser { email, role });

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
