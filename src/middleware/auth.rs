//! Autenticación JWT
//!
//! Extractor de `AuthenticatedUser` a partir del header Authorization y
//! verificación de permisos de escritura.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    models::auth::{AuthenticatedUser, UserRole},
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::{extract_token_from_header, verify_token, JwtConfig},
    },
};

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let token = extract_token_from_header(auth_header)?;
        let claims = verify_token(token, &JwtConfig::from(&state.config))?;

        let role = UserRole::parse(&claims.role)
            .ok_or_else(|| AppError::Unauthorized(format!("Rol desconocido: {}", claims.role)))?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role,
        })
    }
}

/// Rechazar con `Forbidden` a quien no sea administrador
pub fn require_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if !user.can_write() {
        tracing::warn!("User {} attempted a write without admin role", user.user_id);
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }
    Ok(())
}
