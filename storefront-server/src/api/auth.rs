//! Authentication endpoints: signup, login

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{BusinessProfile, FREE_PLAN};
use shared::util::{is_valid_slug, now_millis, slugify, snowflake_id};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::tenant_auth::create_token;
use crate::db;
use crate::error::{ServiceError, map_unique};
use crate::hours::parse_timezone;
use crate::state::AppState;

use super::{ApiResult, validation_error};

const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "business_name must be 1-120 characters"))]
    pub business_name: String,
    pub slug: Option<String>,
    pub timezone: Option<String>,
    pub phone: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account_id: i64,
    pub profile_id: Option<i64>,
    pub is_admin: bool,
}

/// Find a free slug derived from `base`: `base`, `base-2`, `base-3`, ...
async fn unique_slug(pool: &SqlitePool, base: &str) -> Result<String, sqlx::Error> {
    let base = if base.is_empty() { "store" } else { base };
    if !db::profiles::slug_taken(pool, base, 0).await? {
        return Ok(base.to_string());
    }
    for n in 2..100 {
        let candidate = format!("{base}-{n}");
        if !db::profiles::slug_taken(pool, &candidate, 0).await? {
            return Ok(candidate);
        }
    }
    Ok(format!("{base}-{}", snowflake_id()))
}

fn token_error(e: jsonwebtoken::errors::Error) -> ServiceError {
    tracing::error!("JWT creation failed: {e}");
    AppError::new(ErrorCode::InternalError).into()
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<AuthResponse> {
    req.validate().map_err(validation_error)?;

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort)
            .with_detail("field", "password")
            .with_detail("min_length", MIN_PASSWORD_LEN)
            .into());
    }

    let email = req.email.trim().to_lowercase();
    if db::accounts::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered).into());
    }

    let business_name = req.business_name.trim().to_string();
    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            if !is_valid_slug(slug) {
                return Err(AppError::new(ErrorCode::SlugInvalid)
                    .with_detail("field", "slug")
                    .into());
            }
            if db::profiles::slug_taken(&state.pool, slug, 0).await? {
                return Err(AppError::new(ErrorCode::SlugTaken).into());
            }
            slug.to_string()
        }
        None => unique_slug(&state.pool, &slugify(&business_name)).await?,
    };

    let timezone = match req.timezone.as_deref() {
        Some(tz) => parse_timezone(tz)
            .ok_or_else(|| AppError::new(ErrorCode::TimezoneInvalid).with_detail("field", "timezone"))?,
        None => state.default_timezone,
    };

    let hashed = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let plan = db::subscriptions::find_plan(&state.pool, FREE_PLAN)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PlanNotFound))?;

    let now = now_millis();
    let account_id = snowflake_id();
    let profile = BusinessProfile {
        id: snowflake_id(),
        account_id,
        business_name,
        slug,
        phone: req.phone.filter(|p| !p.trim().is_empty()),
        address: None,
        email: Some(email.clone()),
        timezone: timezone.name().to_string(),
        is_open: true,
        delivery_available: false,
        delivery_fee: 0.0,
        minimum_order_value: 0.0,
        tax_rate: 0.0,
        payment_methods: Vec::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let today = chrono::Utc::now().with_timezone(&timezone).date_naive();
    let subscription = db::subscriptions::new_subscription(profile.id, &plan, today, true, now);

    let mut tx = state.pool.begin().await?;
    db::accounts::create(&mut *tx, account_id, &email, &hashed, false, now)
        .await
        .map_err(|e| map_unique(e, AppError::new(ErrorCode::EmailAlreadyRegistered)))?;
    db::profiles::create(&mut *tx, &profile)
        .await
        .map_err(|e| map_unique(e, AppError::new(ErrorCode::SlugTaken)))?;
    db::subscriptions::insert(&mut *tx, &subscription).await?;
    tx.commit().await?;

    tracing::info!(account_id, profile_id = profile.id, slug = %profile.slug, "Store registered");

    let token = create_token(account_id, Some(profile.id), &email, false, &state.jwt_secret)
        .map_err(token_error)?;

    Ok(Json(AuthResponse {
        token,
        account_id,
        profile_id: Some(profile.id),
        is_admin: false,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    let account = db::accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &account.hashed_password) {
        return Err(AppError::invalid_credentials().into());
    }

    let profile_id = db::profiles::find_by_account(&state.pool, account.id)
        .await?
        .map(|p| p.id);

    let token = create_token(
        account.id,
        profile_id,
        &account.email,
        account.is_admin,
        &state.jwt_secret,
    )
    .map_err(token_error)?;

    tracing::info!(account_id = account.id, "Login");

    Ok(Json(AuthResponse {
        token,
        account_id: account.id,
        profile_id,
        is_admin: account.is_admin,
    }))
}
