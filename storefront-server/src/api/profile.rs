//! Business profile endpoints

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{BusinessProfile, BusinessProfileUpdate};
use shared::util::{is_valid_slug, now_millis, slugify};
use sqlx::SqlitePool;

use crate::auth::TenantIdentity;
use crate::db;
use crate::error::{ServiceResult, map_unique};
use crate::hours::parse_timezone;
use crate::orders::money::is_valid_price;
use crate::state::AppState;

use super::ApiResult;

/// Load the profile of the authenticated store
pub async fn load_profile(pool: &SqlitePool, profile_id: i64) -> ServiceResult<BusinessProfile> {
    db::profiles::find_by_id(pool, profile_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound).into())
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !is_valid_price(v) => Err(AppError::invalid_field(
            field,
            format!("{field} must be a non-negative amount"),
        )),
        _ => Ok(()),
    }
}

/// Apply a partial update, validating every provided field
pub fn apply_update(profile: &mut BusinessProfile, update: BusinessProfileUpdate) -> Result<(), AppError> {
    check_amount("delivery_fee", update.delivery_fee)?;
    check_amount("minimum_order_value", update.minimum_order_value)?;
    check_amount("tax_rate", update.tax_rate)?;

    if let Some(name) = update.business_name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_field("business_name", "business_name must not be empty"));
        }
        profile.business_name = name.to_string();
    }

    match update.slug.as_deref().map(str::trim) {
        Some("") => profile.slug = slugify(&profile.business_name),
        Some(slug) => profile.slug = slug.to_string(),
        None => {}
    }
    if !is_valid_slug(&profile.slug) {
        return Err(AppError::new(ErrorCode::SlugInvalid)
            .with_detail("field", "slug")
            .with_detail("value", profile.slug.clone()));
    }

    if let Some(tz) = update.timezone {
        let parsed = parse_timezone(tz.trim())
            .ok_or_else(|| AppError::new(ErrorCode::TimezoneInvalid).with_detail("field", "timezone"))?;
        profile.timezone = parsed.name().to_string();
    }

    if let Some(v) = update.phone {
        profile.phone = Some(v).filter(|s| !s.trim().is_empty());
    }
    if let Some(v) = update.address {
        profile.address = Some(v).filter(|s| !s.trim().is_empty());
    }
    if let Some(v) = update.email {
        profile.email = Some(v).filter(|s| !s.trim().is_empty());
    }
    if let Some(v) = update.is_open {
        profile.is_open = v;
    }
    if let Some(v) = update.delivery_available {
        profile.delivery_available = v;
    }
    if let Some(v) = update.delivery_fee {
        profile.delivery_fee = v;
    }
    if let Some(v) = update.minimum_order_value {
        profile.minimum_order_value = v;
    }
    if let Some(v) = update.tax_rate {
        profile.tax_rate = v;
    }
    if let Some(v) = update.payment_methods {
        profile.payment_methods = v;
    }
    Ok(())
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<BusinessProfile> {
    Ok(Json(load_profile(&state.pool, identity.profile_id).await?))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(update): Json<BusinessProfileUpdate>,
) -> ApiResult<BusinessProfile> {
    let mut profile = load_profile(&state.pool, identity.profile_id).await?;
    apply_update(&mut profile, update)?;

    if db::profiles::slug_taken(&state.pool, &profile.slug, profile.id).await? {
        return Err(AppError::new(ErrorCode::SlugTaken).into());
    }

    profile.updated_at = now_millis();
    db::profiles::update(&state.pool, &profile)
        .await
        .map_err(|e| map_unique(e, AppError::new(ErrorCode::SlugTaken)))?;

    tracing::info!(profile_id = profile.id, "Profile updated");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            id: 1,
            account_id: 1,
            business_name: "Pizza Bella".into(),
            slug: "pizza-bella".into(),
            phone: None,
            address: None,
            email: None,
            timezone: "America/Sao_Paulo".into(),
            is_open: true,
            delivery_available: false,
            delivery_fee: 0.0,
            minimum_order_value: 0.0,
            tax_rate: 0.0,
            payment_methods: vec![],
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_empty_slug_is_derived_from_name() {
        let mut p = profile();
        let update = BusinessProfileUpdate {
            business_name: Some("Café do Zé".into()),
            slug: Some(String::new()),
            ..Default::default()
        };
        apply_update(&mut p, update).unwrap();
        assert_eq!(p.slug, "cafe-do-ze");
    }

    #[test]
    fn test_malformed_slug_rejected() {
        let mut p = profile();
        let update = BusinessProfileUpdate {
            slug: Some("Bad Slug!".into()),
            ..Default::default()
        };
        let err = apply_update(&mut p, update).unwrap_err();
        assert_eq!(err.code, ErrorCode::SlugInvalid);
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let mut p = profile();
        let update = BusinessProfileUpdate {
            timezone: Some("Nowhere/City".into()),
            ..Default::default()
        };
        let err = apply_update(&mut p, update).unwrap_err();
        assert_eq!(err.code, ErrorCode::TimezoneInvalid);
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut p = profile();
        let update = BusinessProfileUpdate {
            delivery_fee: Some(-2.0),
            ..Default::default()
        };
        let err = apply_update(&mut p, update).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
