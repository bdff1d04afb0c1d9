#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{
    BusinessProfile, Category, Ingredient, IngredientAssociation, IngredientCategory, Product,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use storefront_server::{AppState, Config, db};
use tempfile::TempDir;
use tower::ServiceExt;

/// Fresh database in a temp dir; keep the `TempDir` alive for the test
pub async fn test_state(configure: impl FnOnce(&mut Config)) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let mut config = Config::for_database(path.to_string_lossy().to_string());
    configure(&mut config);
    let state = AppState::new(&config).await.unwrap();
    (dir, state)
}

pub async fn seed_store(pool: &SqlitePool, slug: &str) -> BusinessProfile {
    let now = now_millis();
    let account_id = snowflake_id();
    db::accounts::create(pool, account_id, &format!("{slug}@example.com"), "x", false, now)
        .await
        .unwrap();
    let profile = BusinessProfile {
        id: snowflake_id(),
        account_id,
        business_name: slug.to_string(),
        slug: slug.to_string(),
        phone: None,
        address: None,
        email: None,
        timezone: "America/Sao_Paulo".to_string(),
        is_open: true,
        delivery_available: false,
        delivery_fee: 0.0,
        minimum_order_value: 0.0,
        tax_rate: 0.0,
        payment_methods: vec!["pix".to_string()],
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db::profiles::create(pool, &profile).await.unwrap();
    profile
}

pub async fn seed_category(pool: &SqlitePool, profile_id: i64, name: &str) -> Category {
    let category = Category {
        id: snowflake_id(),
        profile_id,
        name: name.to_string(),
        emoji: None,
        description: None,
        sort_order: 0,
        is_active: true,
    };
    db::catalog::insert_category(pool, &category).await.unwrap();
    category
}

pub async fn seed_ingredient_category(
    pool: &SqlitePool,
    profile_id: i64,
    name: &str,
) -> IngredientCategory {
    let category = IngredientCategory {
        id: snowflake_id(),
        profile_id,
        name: name.to_string(),
        description: None,
        is_extra: false,
    };
    db::catalog::save_ingredient_category(pool, &category)
        .await
        .unwrap();
    category
}

pub async fn seed_ingredient(
    pool: &SqlitePool,
    profile_id: i64,
    category_id: Option<i64>,
    name: &str,
    price: f64,
    is_extra: bool,
) -> Ingredient {
    let ingredient = Ingredient {
        id: snowflake_id(),
        profile_id,
        category_id,
        name: name.to_string(),
        description: None,
        price,
        is_active: true,
        is_extra,
    };
    db::catalog::save_ingredient(pool, &ingredient).await.unwrap();
    ingredient
}

pub async fn seed_product(
    pool: &SqlitePool,
    profile_id: i64,
    category_id: i64,
    name: &str,
    price: f64,
) -> Product {
    let now = now_millis();
    let product = Product {
        id: snowflake_id(),
        profile_id,
        category_id,
        name: name.to_string(),
        description: None,
        price,
        is_active: true,
        created_at: now,
        updated_at: now,
        associations: Vec::new(),
    };
    db::catalog::save_product(pool, &product, None).await.unwrap();
    product
}

pub async fn seed_association(
    pool: &SqlitePool,
    product_id: i64,
    ingredient_id: i64,
    group_name: &str,
    price: Option<f64>,
    is_extra: bool,
) -> IngredientAssociation {
    let assoc = IngredientAssociation {
        id: snowflake_id(),
        product_id,
        ingredient_id,
        group_name: group_name.to_string(),
        is_required: false,
        max_quantity: 1,
        price,
        is_extra,
    };
    let mut conn = pool.acquire().await.unwrap();
    db::catalog::insert_association(&mut conn, &assoc)
        .await
        .unwrap();
    assoc
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

/// Send a JSON request through the router
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
