mod common;

use common::*;
use shared::models::{CreateOrderRequest, LineRequest};
use storefront_server::orders::{ComposeOptions, compose_order, validate_request};

const CONCURRENT_ORDERS: usize = 20;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_get_unique_sequential_numbers() {
    let (_dir, state) = test_state(|_| {}).await;
    let store = seed_store(&state.pool, "rush-hour").await;
    let category = seed_category(&state.pool, store.id, "Food").await;
    let product = seed_product(&state.pool, store.id, category.id, "Combo", 30.0).await;
    let store_id = store.id;

    let handles: Vec<_> = (0..CONCURRENT_ORDERS)
        .map(|i| {
            let pool = state.pool.clone();
            let request = CreateOrderRequest {
                customer_name: Some(format!("Customer {i}")),
                lines: vec![LineRequest {
                    product_id: Some(product.id),
                    quantity: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            };
            tokio::spawn(async move {
                let validated = validate_request(request).unwrap();
                compose_order(&pool, store_id, validated, ComposeOptions::default())
                    .await
                    .unwrap()
                    .order_number
            })
        })
        .collect();

    let mut numbers: Vec<i64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    numbers.sort_unstable();

    let expected: Vec<i64> = (1..=CONCURRENT_ORDERS as i64).collect();
    assert_eq!(numbers, expected);
    assert_eq!(count(&state.pool, "orders").await, CONCURRENT_ORDERS as i64);
}
