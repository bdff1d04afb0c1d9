//! Order persistence: sequence, snapshots and listings

use shared::models::{Order, OrderLine, OrderLineIngredient, OrderStatus};
use sqlx::{Executor, Sqlite, SqliteConnection};

/// Claim the next order number of a store.
///
/// Must run inside the order transaction: the upsert takes the SQLite write
/// lock, so concurrent orders serialize until commit.
pub async fn next_order_number(
    conn: &mut SqliteConnection,
    profile_id: i64,
) -> Result<i64, sqlx::Error> {
    let (number,): (i64,) = sqlx::query_as(
        "INSERT INTO order_sequences (profile_id, last_number) VALUES (?1, 1)
         ON CONFLICT (profile_id) DO UPDATE SET last_number = last_number + 1
         RETURNING last_number",
    )
    .bind(profile_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(number)
}

pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO orders (
            id, profile_id, order_number, customer_name, customer_phone, customer_address,
            status, total_amount, notes, payment_method, change_amount, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )
    .bind(order.id)
    .bind(order.profile_id)
    .bind(order.order_number)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(order.status)
    .bind(order.total_amount)
    .bind(&order.notes)
    .bind(&order.payment_method)
    .bind(order.change_amount)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_line(conn: &mut SqliteConnection, line: &OrderLine) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_lines (id, order_id, product_id, product_name, quantity, unit_price, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(line.id)
    .bind(line.order_id)
    .bind(line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(&line.notes)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Insert a line ingredient, or refresh the added flag and price of the
/// existing row with the same (line, ingredient, group, extra) key
pub async fn upsert_line_ingredient(
    conn: &mut SqliteConnection,
    item: &OrderLineIngredient,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_line_ingredients (
            id, line_id, ingredient_id, ingredient_name, group_name, is_extra, is_added, price
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (line_id, ingredient_id, group_name, is_extra)
         DO UPDATE SET is_added = excluded.is_added, price = excluded.price",
    )
    .bind(item.id)
    .bind(item.line_id)
    .bind(item.ingredient_id)
    .bind(&item.ingredient_name)
    .bind(&item.group_name)
    .bind(item.is_extra)
    .bind(item.is_added)
    .bind(item.price)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn set_total(
    conn: &mut SqliteConnection,
    order_id: i64,
    total_amount: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET total_amount = ?1 WHERE id = ?2")
        .bind(total_amount)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Prices of the ingredients still added to a line
pub async fn added_ingredient_prices(
    conn: &mut SqliteConnection,
    line_id: i64,
) -> Result<Vec<f64>, sqlx::Error> {
    let rows: Vec<(f64,)> = sqlx::query_as(
        "SELECT price FROM order_line_ingredients WHERE line_id = ?1 AND is_added = 1",
    )
    .bind(line_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(|(price,)| price).collect())
}

/// Load the lines and line ingredients of `order`
async fn attach_lines(conn: &mut SqliteConnection, order: &mut Order) -> Result<(), sqlx::Error> {
    let mut lines: Vec<OrderLine> =
        sqlx::query_as("SELECT * FROM order_lines WHERE order_id = ?1 ORDER BY id")
            .bind(order.id)
            .fetch_all(&mut *conn)
            .await?;

    let ingredients: Vec<OrderLineIngredient> = sqlx::query_as(
        "SELECT i.* FROM order_line_ingredients i
         JOIN order_lines l ON l.id = i.line_id
         WHERE l.order_id = ?1
         ORDER BY i.id",
    )
    .bind(order.id)
    .fetch_all(&mut *conn)
    .await?;

    for ingredient in ingredients {
        if let Some(line) = lines.iter_mut().find(|l| l.id == ingredient.line_id) {
            line.ingredients.push(ingredient);
        }
    }

    order.lines = lines;
    Ok(())
}

/// Order with its lines and ingredients
pub async fn fetch_order_detail(
    conn: &mut SqliteConnection,
    profile_id: i64,
    id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = ?1 AND profile_id = ?2")
            .bind(id)
            .bind(profile_id)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(mut order) = order else {
        return Ok(None);
    };
    attach_lines(conn, &mut order).await?;
    Ok(Some(order))
}

/// Filter for order listings; time bounds are Unix millis, `to` exclusive
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// Orders of a store, newest first, with their lines
pub async fn list_orders(
    conn: &mut SqliteConnection,
    profile_id: i64,
    filter: &OrderFilter,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut orders: Vec<Order> = sqlx::query_as(
        "SELECT * FROM orders
         WHERE profile_id = ?1
           AND (?2 IS NULL OR status = ?2)
           AND (?3 IS NULL OR created_at >= ?3)
           AND (?4 IS NULL OR created_at < ?4)
         ORDER BY created_at DESC, order_number DESC
         LIMIT ?5 OFFSET ?6",
    )
    .bind(profile_id)
    .bind(filter.status)
    .bind(filter.from)
    .bind(filter.to)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(&mut *conn)
    .await?;

    for order in &mut orders {
        attach_lines(conn, order).await?;
    }
    Ok(orders)
}

pub async fn count_orders<'e, E>(
    executor: E,
    profile_id: i64,
    filter: &OrderFilter,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders
         WHERE profile_id = ?1
           AND (?2 IS NULL OR status = ?2)
           AND (?3 IS NULL OR created_at >= ?3)
           AND (?4 IS NULL OR created_at < ?4)",
    )
    .bind(profile_id)
    .bind(filter.status)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Returns false when the order does not exist for this store
pub async fn update_status<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND profile_id = ?4",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .bind(profile_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_order<'e, E>(executor: E, profile_id: i64, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM orders WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
