//! Identity extraction for route handlers.
//!
//! Session issuance and password handling live in a separate service; this
//! module only verifies the bearer token it minted and resolves the account
//! it names. Two extractors: `AuthUser` rejects unauthenticated requests,
//! `OptionalAuthUser` degrades to an anonymous viewer on any failure so that
//! public endpoints keep working with a stale or missing token.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct Claims {
    id: i64,
    #[allow(dead_code)]
    exp: usize,
}

/// An authenticated account: the token checked out and the user still exists.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    /// Role gate for handlers. Authenticated but wrong-role requests are
    /// Forbidden, not Unauthorized.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn authenticate(db: &PgPool, secret: &str, token: &str) -> Result<AuthUser, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized)?
    .claims;

    // The token may outlive the account; re-check existence on every request.
    let row: Option<(i64, String)> = sqlx::query_as("SELECT id, role FROM users WHERE id = $1")
        .bind(claims.id)
        .fetch_optional(db)
        .await?;

    let (id, role) = row.ok_or(AppError::Unauthorized)?;
    let role = Role::parse(&role).ok_or(AppError::Unauthorized)?;

    Ok(AuthUser { id, role })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or(AppError::Unauthorized)?
            .to_string();
        authenticate(&state.db, &state.config.jwt_secret, &token).await
    }
}

/// Viewer identity for public endpoints: present when a valid token was sent,
/// `None` otherwise. Invalid or expired tokens are treated as anonymous.
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Some(token) => token.to_string(),
            None => return Ok(OptionalAuthUser(None)),
        };
        let user = authenticate(&state.db, &state.config.jwt_secret, &token)
            .await
            .ok();
        Ok(OptionalAuthUser(user))
    }
}
