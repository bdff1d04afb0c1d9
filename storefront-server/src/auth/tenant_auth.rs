//! JWT authentication for the management and admin APIs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// JWT claims for account authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Account ID
    pub sub: String,
    /// Business profile owned by the account
    #[serde(default)]
    pub profile_id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated store owner, inserted by [`tenant_auth_middleware`]
#[derive(Debug, Clone)]
pub struct TenantIdentity {
    pub account_id: i64,
    pub profile_id: i64,
    pub email: String,
}

/// Authenticated administrator, inserted by [`admin_auth_middleware`]
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub account_id: i64,
    pub email: String,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT for an account
pub fn create_token(
    account_id: i64,
    profile_id: Option<i64>,
    email: &str,
    admin: bool,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AccountClaims {
        sub: account_id.to_string(),
        profile_id,
        email: email.to_string(),
        admin,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify the bearer token of a request
fn decode_request(request: &Request, secret: &str) -> Result<AccountClaims, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let token_data = jsonwebtoken::decode::<AccountClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    Ok(token_data.claims)
}

fn account_id(claims: &AccountClaims) -> Result<i64, AppError> {
    claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed subject"))
}

/// Middleware for store owner routes
pub async fn tenant_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = decode_request(&request, &state.jwt_secret).map_err(IntoResponse::into_response)?;
    let account_id = account_id(&claims).map_err(IntoResponse::into_response)?;
    let profile_id = claims
        .profile_id
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound).into_response())?;

    request.extensions_mut().insert(TenantIdentity {
        account_id,
        profile_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Middleware for admin routes
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = decode_request(&request, &state.jwt_secret).map_err(IntoResponse::into_response)?;
    if !claims.admin {
        return Err(AppError::new(ErrorCode::AdminRequired).into_response());
    }
    let account_id = account_id(&claims).map_err(IntoResponse::into_response)?;

    request.extensions_mut().insert(AdminIdentity {
        account_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
