//! API routes for storefront-server

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod profile;
pub mod public;
pub mod schedule;
pub mod subscription;

use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use shared::error::AppError;

use crate::auth::tenant_auth::{admin_auth_middleware, tenant_auth_middleware};
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// Page size used when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalize optional `page`/`page_size` query values (pages start at 1)
pub fn paging(page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

/// Row offset of `page`, computed wide so any `u32` page is safe
pub fn page_offset(page: u32, page_size: u32) -> i64 {
    (i64::from(page) - 1).max(0) * i64::from(page_size)
}

/// Turn a validator failure into a field-level error for its first field
pub fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    match fields.first() {
        Some((field, errs)) => {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            AppError::invalid_field(field.to_string(), message)
        }
        None => AppError::validation(errors.to_string()),
    }
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Store owner API (JWT authenticated)
    let tenant = Router::new()
        .route("/api/profile", get(profile::get_profile).put(profile::update_profile))
        .route(
            "/api/schedule",
            get(schedule::get_schedule).put(schedule::replace_schedule),
        )
        .route(
            "/api/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/api/ingredient-categories",
            get(catalog::list_ingredient_categories).post(catalog::create_ingredient_category),
        )
        .route(
            "/api/ingredient-categories/{id}",
            get(catalog::get_ingredient_category)
                .put(catalog::update_ingredient_category)
                .delete(catalog::delete_ingredient_category),
        )
        .route(
            "/api/ingredients",
            get(catalog::list_ingredients).post(catalog::create_ingredient),
        )
        .route(
            "/api/ingredients/{id}",
            get(catalog::get_ingredient)
                .put(catalog::update_ingredient)
                .delete(catalog::delete_ingredient),
        )
        .route(
            "/api/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/api/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/api/orders/{id}",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/api/orders/{id}/status", patch(orders::update_status))
        .route("/api/dashboard/summary", get(dashboard::summary))
        .route("/api/subscription", get(subscription::current))
        .route("/api/subscription/history", get(subscription::history))
        .route("/api/plans", get(subscription::list_plans))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_auth_middleware,
        ));

    // Platform administration (admin JWT)
    let admin = Router::new()
        .route("/api/admin/metrics", get(admin::metrics))
        .route("/api/admin/companies", get(admin::list_companies))
        .route(
            "/api/admin/companies/{id}",
            delete(admin::delete_company),
        )
        .route("/api/admin/companies/{id}/block", patch(admin::set_blocked))
        .route(
            "/api/admin/companies/{id}/subscription",
            post(admin::assign_subscription),
        )
        .route(
            "/api/admin/subscriptions/{id}",
            patch(admin::set_subscription_active),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    // Customer-facing storefront (no auth)
    let public = Router::new()
        .route("/api/public/stores/{slug}", get(public::storefront))
        .route("/api/public/stores/{slug}/orders", post(public::place_order));

    let auth = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth)
        .merge(public)
        .merge(tenant)
        .merge(admin)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults_and_bounds() {
        assert_eq!(paging(None, None), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(paging(Some(0), Some(0)), (1, 1));
        assert_eq!(paging(Some(3), Some(500)), (3, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_page_offset_does_not_overflow() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 25), 50);

        let (page, page_size) = paging(Some(u32::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(
            page_offset(page, page_size),
            (i64::from(u32::MAX) - 1) * i64::from(MAX_PAGE_SIZE)
        );
    }
}
