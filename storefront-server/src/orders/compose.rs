//! Order composition
//!
//! Validation happens up front and touches nothing. Persistence happens in a
//! single transaction whose first statement claims the order number, so a
//! failing line leaves no order, no number gap visible to others and no
//! catalog side effects.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CreateOrderRequest, IngredientAssociation, IngredientSelection, Order, OrderLine,
    OrderLineIngredient, OrderStatus,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::money::{self, MAX_QUANTITY};
use super::{ComposeOptions, TotalPolicy};
use crate::db;
use crate::db::catalog::IngredientRef;
use crate::error::ServiceResult;

/// Group used for globally extra ingredients without an association
pub const EXTRAS_GROUP: &str = "Extras";
/// Last-resort group name
pub const FALLBACK_GROUP: &str = "Other";

/// Order request that passed shape validation
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub change_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub lines: Vec<ValidatedLine>,
}

#[derive(Debug, Clone)]
pub struct ValidatedLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Option<f64>,
    pub notes: Option<String>,
    pub ingredients: Vec<IngredientSelection>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_price(value: Option<f64>, field: impl FnOnce() -> String) -> Result<(), AppError> {
    match value {
        Some(price) if !money::is_valid_price(price) => Err(AppError::invalid_field(
            field(),
            format!("price must be between 0 and {}", money::MAX_PRICE),
        )
        .with_detail("value", price.to_string())),
        _ => Ok(()),
    }
}

/// Check the shape of an order request before anything is persisted
pub fn validate_request(request: CreateOrderRequest) -> Result<ValidatedOrder, AppError> {
    let customer_name = non_empty(request.customer_name)
        .ok_or_else(|| AppError::invalid_field("customer_name", "customer_name is required"))?;

    if request.lines.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).with_detail("field", "lines"));
    }

    check_price(request.total_amount, || "total_amount".to_string())?;
    check_price(request.change_amount, || "change_amount".to_string())?;

    let mut lines = Vec::with_capacity(request.lines.len());
    for (i, line) in request.lines.into_iter().enumerate() {
        let product_id = line.product_id.ok_or_else(|| {
            AppError::invalid_field(format!("lines[{i}].product_id"), "product_id is required")
        })?;

        let quantity = line.quantity.ok_or_else(|| {
            AppError::invalid_field(format!("lines[{i}].quantity"), "quantity is required")
        })?;
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(AppError::invalid_field(
                format!("lines[{i}].quantity"),
                format!("quantity must be between 1 and {MAX_QUANTITY}"),
            )
            .with_detail("value", quantity));
        }

        check_price(line.unit_price, || format!("lines[{i}].unit_price"))?;
        for (j, selection) in line.ingredients.iter().enumerate() {
            check_price(selection.price, || format!("lines[{i}].ingredients[{j}].price"))?;
        }

        lines.push(ValidatedLine {
            product_id,
            quantity,
            unit_price: line.unit_price,
            notes: non_empty(line.notes),
            ingredients: line.ingredients,
        });
    }

    Ok(ValidatedOrder {
        customer_name,
        customer_phone: non_empty(request.customer_phone),
        customer_address: non_empty(request.customer_address),
        notes: non_empty(request.notes),
        payment_method: non_empty(request.payment_method),
        change_amount: request.change_amount,
        total_amount: request.total_amount,
        lines,
    })
}

/// Pick the group an ingredient selection lands in.
///
/// Explicit request group, then the matched association's group, then
/// [`EXTRAS_GROUP`] for globally extra ingredients, then the ingredient's
/// category, then [`FALLBACK_GROUP`].
pub fn resolve_group_name(
    requested: Option<&str>,
    association: Option<&IngredientAssociation>,
    ingredient_is_extra: bool,
    category_name: Option<&str>,
) -> String {
    if let Some(group) = requested {
        return group.to_string();
    }
    if let Some(assoc) = association {
        return assoc.group_name.clone();
    }
    if ingredient_is_extra {
        return EXTRAS_GROUP.to_string();
    }
    category_name
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(FALLBACK_GROUP)
        .to_string()
}

/// Place an order for `profile_id`
pub async fn compose_order(
    pool: &SqlitePool,
    profile_id: i64,
    request: ValidatedOrder,
    options: ComposeOptions,
) -> ServiceResult<Order> {
    let mut tx = pool.begin().await?;

    let order_number = db::orders::next_order_number(&mut tx, profile_id).await?;
    let now = now_millis();
    let order_id = snowflake_id();

    let order = Order {
        id: order_id,
        profile_id,
        order_number,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        customer_address: request.customer_address,
        status: OrderStatus::Pending,
        total_amount: 0.0,
        notes: request.notes,
        payment_method: request.payment_method,
        change_amount: request.change_amount,
        created_at: now,
        updated_at: now,
        lines: Vec::new(),
    };
    db::orders::insert_order(&mut tx, &order).await?;

    let mut computed = Decimal::ZERO;
    for (index, line) in request.lines.into_iter().enumerate() {
        let product = db::catalog::find_product(&mut *tx, profile_id, line.product_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ItemNotFound)
                    .with_detail("field", format!("lines[{index}].product_id"))
                    .with_detail("product_id", line.product_id)
            })?;

        let order_line = OrderLine {
            id: snowflake_id(),
            order_id,
            product_id: Some(product.id),
            product_name: product.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.unwrap_or(product.price),
            notes: line.notes,
            ingredients: Vec::new(),
        };
        db::orders::insert_line(&mut tx, &order_line).await?;

        for selection in &line.ingredients {
            apply_selection(&mut tx, profile_id, product.id, order_line.id, selection, options)
                .await?;
        }

        let prices = db::orders::added_ingredient_prices(&mut tx, order_line.id).await?;
        computed += money::line_total(order_line.unit_price, order_line.quantity, &prices);
    }

    let computed = money::to_f64(computed);
    let total = match request.total_amount {
        None => computed,
        Some(client) if money::money_eq(client, computed) => client,
        Some(client) => match options.total_policy {
            TotalPolicy::Trust => {
                tracing::warn!(
                    profile_id,
                    order_number,
                    client_total = client,
                    computed_total = computed,
                    "Client order total differs from computed total"
                );
                client
            }
            TotalPolicy::Verify => {
                return Err(AppError::new(ErrorCode::OrderTotalMismatch)
                    .with_detail("total_amount", client.to_string())
                    .with_detail("computed_total", computed.to_string())
                    .into());
            }
        },
    };
    db::orders::set_total(&mut tx, order_id, total).await?;

    let placed = db::orders::fetch_order_detail(&mut tx, profile_id, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished during composition"))?;

    tx.commit().await?;

    tracing::info!(
        profile_id,
        order_id,
        order_number,
        lines = placed.lines.len(),
        total = placed.total_amount,
        "Order placed"
    );
    Ok(placed)
}

/// Resolve one ingredient selection and record it on the line
async fn apply_selection(
    conn: &mut SqliteConnection,
    profile_id: i64,
    product_id: i64,
    line_id: i64,
    selection: &IngredientSelection,
    options: ComposeOptions,
) -> Result<(), sqlx::Error> {
    let Some(ingredient_id) = selection.ingredient_id else {
        tracing::warn!(profile_id, line_id, "Ingredient selection without id, skipped");
        return Ok(());
    };
    let Some(ingredient) = db::catalog::find_ingredient_ref(&mut *conn, profile_id, ingredient_id).await?
    else {
        tracing::warn!(profile_id, line_id, ingredient_id, "Unknown ingredient, skipped");
        return Ok(());
    };

    let requested_group = selection
        .group_name
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());

    let association =
        db::catalog::find_association(conn, product_id, ingredient.id, requested_group).await?;

    let group_name = resolve_group_name(
        requested_group,
        association.as_ref(),
        ingredient.is_extra,
        ingredient.category_name.as_deref(),
    );

    let is_extra = selection.is_extra.unwrap_or_else(|| {
        association
            .as_ref()
            .map(|a| a.is_extra)
            .unwrap_or(ingredient.is_extra)
    });

    if options.catalog_learning {
        learn_association(
            conn,
            product_id,
            &ingredient,
            association.as_ref(),
            &group_name,
            selection.is_extra,
        )
        .await?;
    }

    let price = selection
        .price
        .or_else(|| association.as_ref().and_then(|a| a.price))
        .unwrap_or(ingredient.price);

    let item = OrderLineIngredient {
        id: snowflake_id(),
        line_id,
        ingredient_id: Some(ingredient.id),
        ingredient_name: ingredient.name.clone(),
        group_name,
        is_extra,
        is_added: selection.is_added.unwrap_or(true),
        price,
    };
    db::orders::upsert_line_ingredient(conn, &item).await
}

/// Promote an existing association to extra, or create the missing one
async fn learn_association(
    conn: &mut SqliteConnection,
    product_id: i64,
    ingredient: &IngredientRef,
    association: Option<&IngredientAssociation>,
    group_name: &str,
    requested_extra: Option<bool>,
) -> Result<(), sqlx::Error> {
    match association {
        Some(assoc) => {
            if requested_extra == Some(true) && !assoc.is_extra {
                db::catalog::mark_association_extra(conn, assoc.id).await?;
                tracing::debug!(association_id = assoc.id, "Association promoted to extra");
            }
        }
        None => {
            let created = IngredientAssociation {
                id: snowflake_id(),
                product_id,
                ingredient_id: ingredient.id,
                group_name: group_name.to_string(),
                is_required: false,
                max_quantity: 1,
                price: Some(ingredient.price),
                is_extra: requested_extra.unwrap_or(false),
            };
            db::catalog::insert_association(conn, &created).await?;
            tracing::debug!(
                product_id,
                ingredient_id = ingredient.id,
                group = group_name,
                "Association created from order"
            );
        }
    }
    Ok(())
}
