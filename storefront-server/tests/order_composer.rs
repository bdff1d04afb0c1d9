mod common;

use common::*;
use shared::error::ErrorCode;
use shared::models::{CreateOrderRequest, IngredientSelection, LineRequest, OrderStatus};
use storefront_server::db;
use storefront_server::error::ServiceError;
use storefront_server::orders::{ComposeOptions, TotalPolicy, compose_order, validate_request};

fn order(lines: Vec<LineRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: Some("Ana".to_string()),
        lines,
        ..Default::default()
    }
}

fn line(product_id: i64, quantity: i32, ingredients: Vec<IngredientSelection>) -> LineRequest {
    LineRequest {
        product_id: Some(product_id),
        quantity: Some(quantity),
        ingredients,
        ..Default::default()
    }
}

fn pick(ingredient_id: i64) -> IngredientSelection {
    IngredientSelection {
        ingredient_id: Some(ingredient_id),
        ..Default::default()
    }
}

fn learning(on: bool) -> ComposeOptions {
    ComposeOptions {
        catalog_learning: on,
        ..Default::default()
    }
}

fn app_code(err: ServiceError) -> ErrorCode {
    match err {
        ServiceError::App(e) => e.code,
        ServiceError::Db(e) => panic!("unexpected database error: {e}"),
    }
}

#[tokio::test]
async fn test_order_snapshot_and_total() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "burger-bar").await;
    let burgers = seed_category(pool, store.id, "Burgers").await;
    let burger = seed_product(pool, store.id, burgers.id, "Classic", 25.0).await;
    let bacon = seed_ingredient(pool, store.id, None, "Bacon", 4.5, false).await;

    let request = order(vec![line(burger.id, 2, vec![pick(bacon.id)])]);
    let placed = compose_order(pool, store.id, validate_request(request).unwrap(), learning(true))
        .await
        .unwrap();

    assert_eq!(placed.order_number, 1);
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.lines.len(), 1);
    assert_eq!(placed.lines[0].product_name, "Classic");
    assert_eq!(placed.lines[0].unit_price, 25.0);
    // 2 x 25.00 + 4.50, ingredient prices are not multiplied by quantity
    assert_eq!(placed.total_amount, 54.5);

    let ingredient = &placed.lines[0].ingredients[0];
    assert_eq!(ingredient.ingredient_name, "Bacon");
    assert!(ingredient.is_added);
    assert_eq!(ingredient.price, 4.5);
}

#[tokio::test]
async fn test_explicit_group_reuses_association_case_insensitively() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "pizzaria").await;
    let pizzas = seed_category(pool, store.id, "Pizzas").await;
    let pizza = seed_product(pool, store.id, pizzas.id, "Margherita", 40.0).await;
    let basil = seed_ingredient(pool, store.id, None, "Basil", 2.0, false).await;
    seed_association(pool, pizza.id, basil.id, "Toppings", Some(3.0), false).await;

    let selection = IngredientSelection {
        ingredient_id: Some(basil.id),
        group_name: Some("toppings".to_string()),
        ..Default::default()
    };
    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(pizza.id, 1, vec![selection])])).unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    let ingredient = &placed.lines[0].ingredients[0];
    assert_eq!(ingredient.group_name, "toppings");
    // association price beats the ingredient's catalog price
    assert_eq!(ingredient.price, 3.0);
    assert_eq!(count(pool, "product_ingredients").await, 1);
}

#[tokio::test]
async fn test_group_falls_back_to_association_then_category() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "lanches").await;
    let snacks = seed_category(pool, store.id, "Snacks").await;
    let sandwich = seed_product(pool, store.id, snacks.id, "Sandwich", 18.0).await;
    let cheeses = seed_ingredient_category(pool, store.id, "Cheeses").await;
    let cheddar = seed_ingredient(pool, store.id, Some(cheeses.id), "Cheddar", 3.0, false).await;
    let tomato = seed_ingredient(pool, store.id, None, "Tomato", 1.0, false).await;
    let egg = seed_ingredient(pool, store.id, None, "Egg", 2.0, true).await;
    seed_association(pool, sandwich.id, tomato.id, "Veggies", None, false).await;

    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(
            sandwich.id,
            1,
            vec![pick(cheddar.id), pick(tomato.id), pick(egg.id)],
        )]))
        .unwrap(),
        learning(false),
    )
    .await
    .unwrap();

    let group_of = |name: &str| {
        placed.lines[0]
            .ingredients
            .iter()
            .find(|i| i.ingredient_name == name)
            .map(|i| i.group_name.clone())
            .unwrap()
    };
    assert_eq!(group_of("Cheddar"), "Cheeses");
    assert_eq!(group_of("Tomato"), "Veggies");
    assert_eq!(group_of("Egg"), "Extras");

    let egg_line = placed.lines[0]
        .ingredients
        .iter()
        .find(|i| i.ingredient_name == "Egg")
        .unwrap();
    assert!(egg_line.is_extra);
}

#[tokio::test]
async fn test_learning_creates_association_from_order() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "acai").await;
    let bowls = seed_category(pool, store.id, "Bowls").await;
    let bowl = seed_product(pool, store.id, bowls.id, "Acai Bowl", 20.0).await;
    let granola = seed_ingredient(pool, store.id, None, "Granola", 2.5, false).await;

    let selection = IngredientSelection {
        ingredient_id: Some(granola.id),
        group_name: Some("Toppings".to_string()),
        is_extra: Some(true),
        ..Default::default()
    };
    compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(bowl.id, 1, vec![selection])])).unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    let associations = db::catalog::list_associations(pool, bowl.id).await.unwrap();
    assert_eq!(associations.len(), 1);
    let learned = &associations[0];
    assert_eq!(learned.ingredient_id, granola.id);
    assert_eq!(learned.group_name, "Toppings");
    assert_eq!(learned.price, Some(2.5));
    assert_eq!(learned.max_quantity, 1);
    assert!(!learned.is_required);
    assert!(learned.is_extra);
}

#[tokio::test]
async fn test_learning_promotes_existing_association_to_extra() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "cafe").await;
    let drinks = seed_category(pool, store.id, "Drinks").await;
    let latte = seed_product(pool, store.id, drinks.id, "Latte", 12.0).await;
    let syrup = seed_ingredient(pool, store.id, None, "Vanilla syrup", 1.5, false).await;
    let assoc = seed_association(pool, latte.id, syrup.id, "Syrups", None, false).await;

    let selection = IngredientSelection {
        ingredient_id: Some(syrup.id),
        is_extra: Some(true),
        ..Default::default()
    };
    compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(latte.id, 1, vec![selection])])).unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    let associations = db::catalog::list_associations(pool, latte.id).await.unwrap();
    assert_eq!(associations.len(), 1);
    assert_eq!(associations[0].id, assoc.id);
    assert!(associations[0].is_extra);
}

#[tokio::test]
async fn test_learning_disabled_leaves_catalog_unchanged() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "padaria").await;
    let breads = seed_category(pool, store.id, "Breads").await;
    let toast = seed_product(pool, store.id, breads.id, "Toast", 6.0).await;
    let butter = seed_ingredient(pool, store.id, None, "Butter", 1.0, false).await;

    compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(toast.id, 1, vec![pick(butter.id)])])).unwrap(),
        learning(false),
    )
    .await
    .unwrap();

    assert_eq!(count(pool, "product_ingredients").await, 0);
    assert_eq!(count(pool, "order_line_ingredients").await, 1);
}

#[tokio::test]
async fn test_unknown_product_rolls_back_everything() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "sushi").await;
    let rolls = seed_category(pool, store.id, "Rolls").await;
    let roll = seed_product(pool, store.id, rolls.id, "Salmon roll", 30.0).await;
    let sesame = seed_ingredient(pool, store.id, None, "Sesame", 0.5, false).await;

    let request = order(vec![
        line(roll.id, 1, vec![pick(sesame.id)]),
        line(999_999, 1, Vec::new()),
    ]);
    let err = compose_order(pool, store.id, validate_request(request).unwrap(), learning(true))
        .await
        .unwrap_err();
    assert_eq!(app_code(err), ErrorCode::ItemNotFound);

    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_lines").await, 0);
    assert_eq!(count(pool, "product_ingredients").await, 0);

    // the claimed number was rolled back too
    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(roll.id, 1, Vec::new())])).unwrap(),
        learning(true),
    )
    .await
    .unwrap();
    assert_eq!(placed.order_number, 1);
}

#[tokio::test]
async fn test_product_of_other_store_is_not_found() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let mine = seed_store(pool, "mine").await;
    let theirs = seed_store(pool, "theirs").await;
    let category = seed_category(pool, theirs.id, "Food").await;
    let product = seed_product(pool, theirs.id, category.id, "Soup", 15.0).await;

    let err = compose_order(
        pool,
        mine.id,
        validate_request(order(vec![line(product.id, 1, Vec::new())])).unwrap(),
        learning(true),
    )
    .await
    .unwrap_err();
    assert_eq!(app_code(err), ErrorCode::ItemNotFound);
}

#[tokio::test]
async fn test_unknown_ingredient_is_skipped() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "tacos").await;
    let mains = seed_category(pool, store.id, "Mains").await;
    let taco = seed_product(pool, store.id, mains.id, "Taco", 10.0).await;

    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(
            taco.id,
            1,
            vec![pick(424_242), IngredientSelection::default()],
        )]))
        .unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    assert!(placed.lines[0].ingredients.is_empty());
    assert_eq!(placed.total_amount, 10.0);
}

#[tokio::test]
async fn test_repeated_selection_updates_single_row() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "hotdog").await;
    let mains = seed_category(pool, store.id, "Mains").await;
    let hotdog = seed_product(pool, store.id, mains.id, "Hot dog", 9.0).await;
    let onion = seed_ingredient(pool, store.id, None, "Onion", 1.0, false).await;

    let removed = IngredientSelection {
        ingredient_id: Some(onion.id),
        is_added: Some(false),
        ..Default::default()
    };
    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(hotdog.id, 1, vec![pick(onion.id), removed])])).unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    let ingredients = &placed.lines[0].ingredients;
    assert_eq!(ingredients.len(), 1);
    assert!(!ingredients[0].is_added);
    // removed ingredients do not count towards the total
    assert_eq!(placed.total_amount, 9.0);
}

#[tokio::test]
async fn test_same_ingredient_in_two_groups_keeps_both_rows() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "creperia").await;
    let crepes = seed_category(pool, store.id, "Crepes").await;
    let crepe = seed_product(pool, store.id, crepes.id, "Sweet crepe", 20.0).await;
    let nutella = seed_ingredient(pool, store.id, None, "Nutella", 3.0, false).await;

    let in_group = |group: &str| IngredientSelection {
        ingredient_id: Some(nutella.id),
        group_name: Some(group.to_string()),
        ..Default::default()
    };
    let placed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(crepe.id, 1, vec![in_group("A"), in_group("B")])]))
            .unwrap(),
        learning(true),
    )
    .await
    .unwrap();

    let mut groups: Vec<_> = placed.lines[0]
        .ingredients
        .iter()
        .map(|i| i.group_name.as_str())
        .collect();
    groups.sort();
    assert_eq!(groups, ["A", "B"]);
    assert_eq!(count(pool, "order_line_ingredients").await, 2);
    assert_eq!(placed.total_amount, 26.0);

    let associations = db::catalog::list_associations(pool, crepe.id).await.unwrap();
    assert_eq!(associations.len(), 2);
}

#[tokio::test]
async fn test_total_policies() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let store = seed_store(pool, "juice").await;
    let drinks = seed_category(pool, store.id, "Drinks").await;
    let juice = seed_product(pool, store.id, drinks.id, "Orange juice", 8.0).await;

    let with_total = |total: f64| {
        let mut request = order(vec![line(juice.id, 2, Vec::new())]);
        request.total_amount = Some(total);
        validate_request(request).unwrap()
    };

    // trust keeps the client's figure
    let trusted = compose_order(pool, store.id, with_total(15.0), ComposeOptions::default())
        .await
        .unwrap();
    assert_eq!(trusted.total_amount, 15.0);

    let verify = ComposeOptions {
        total_policy: TotalPolicy::Verify,
        ..Default::default()
    };
    let err = compose_order(pool, store.id, with_total(15.0), verify)
        .await
        .unwrap_err();
    assert_eq!(app_code(err), ErrorCode::OrderTotalMismatch);

    // within one cent is a match
    let matched = compose_order(pool, store.id, with_total(16.005), verify)
        .await
        .unwrap();
    assert_eq!(matched.order_number, 2);

    let computed = compose_order(
        pool,
        store.id,
        validate_request(order(vec![line(juice.id, 3, Vec::new())])).unwrap(),
        verify,
    )
    .await
    .unwrap();
    assert_eq!(computed.total_amount, 24.0);
}

#[tokio::test]
async fn test_order_numbers_are_per_store() {
    let (_dir, state) = test_state(|_| {}).await;
    let pool = &state.pool;
    let first = seed_store(pool, "first").await;
    let second = seed_store(pool, "second").await;
    let cat_a = seed_category(pool, first.id, "Food").await;
    let cat_b = seed_category(pool, second.id, "Food").await;
    let product_a = seed_product(pool, first.id, cat_a.id, "A", 1.0).await;
    let product_b = seed_product(pool, second.id, cat_b.id, "B", 1.0).await;

    let mut numbers = Vec::new();
    for (profile_id, product_id) in [
        (first.id, product_a.id),
        (first.id, product_a.id),
        (second.id, product_b.id),
        (first.id, product_a.id),
    ] {
        let placed = compose_order(
            pool,
            profile_id,
            validate_request(order(vec![line(product_id, 1, Vec::new())])).unwrap(),
            learning(true),
        )
        .await
        .unwrap();
        numbers.push(placed.order_number);
    }
    assert_eq!(numbers, vec![1, 2, 1, 3]);
}
