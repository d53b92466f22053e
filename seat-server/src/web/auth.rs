//! Bearer-token extractors.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::auth::{Claims, Stage, validate_token};

use super::routes::AppError;
use super::state::AppState;

/// Holder of any valid session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub stage: Stage,
}

/// Holder of a token whose journey has been verified.
///
/// Marketplace handlers take this rather than [`AuthUser`].
#[derive(Debug, Clone)]
pub struct JourneyUser {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
}

fn claims_from(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".into(),
        })?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid Authorization format. Expected: Bearer <token>".into(),
        })?;

    validate_token(token, &state.jwt).map_err(|e| {
        tracing::debug!(error = %e, "rejected session token");
        AppError::Unauthorized {
            message: "Invalid or expired token".into(),
        }
    })
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_from(parts, state)?;
        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            stage: claims.stage,
        })
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for JourneyUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_from(parts, state)?;
        if claims.stage != Stage::Journey {
            return Err(AppError::Forbidden {
                message: "Verify your journey PNR first".into(),
            });
        }
        Ok(JourneyUser {
            user_id: claims.sub,
            username: claims.username,
            is_staff: claims.is_staff,
        })
    }
}
