//! Catalog database operations: categories, ingredients, products

use std::collections::HashMap;

use shared::models::{
    Category, Ingredient, IngredientAssociation, IngredientCategory, Product,
};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

// ── Categories ──

pub async fn list_categories<'e, E>(
    executor: E,
    profile_id: i64,
    active_only: bool,
) -> Result<Vec<Category>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM categories
         WHERE profile_id = ?1 AND (?2 = 0 OR is_active = 1)
         ORDER BY sort_order, name",
    )
    .bind(profile_id)
    .bind(active_only)
    .fetch_all(executor)
    .await
}

pub async fn find_category<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<Option<Category>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM categories WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_category<'e, E>(executor: E, category: &Category) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO categories (id, profile_id, name, emoji, description, sort_order, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(category.id)
    .bind(category.profile_id)
    .bind(&category.name)
    .bind(&category.emoji)
    .bind(&category.description)
    .bind(category.sort_order)
    .bind(category.is_active)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update_category<'e, E>(executor: E, category: &Category) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE categories
         SET name = ?1, emoji = ?2, description = ?3, sort_order = ?4, is_active = ?5
         WHERE id = ?6 AND profile_id = ?7",
    )
    .bind(&category.name)
    .bind(&category.emoji)
    .bind(&category.description)
    .bind(category.sort_order)
    .bind(category.is_active)
    .bind(category.id)
    .bind(category.profile_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete a category and, by cascade, its products
pub async fn delete_category<'e, E>(executor: E, profile_id: i64, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM categories WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Ingredient categories ──

pub async fn list_ingredient_categories<'e, E>(
    executor: E,
    profile_id: i64,
) -> Result<Vec<IngredientCategory>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM ingredient_categories WHERE profile_id = ?1 ORDER BY name")
        .bind(profile_id)
        .fetch_all(executor)
        .await
}

pub async fn find_ingredient_category<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<Option<IngredientCategory>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM ingredient_categories WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .fetch_optional(executor)
        .await
}

/// Insert or overwrite an ingredient category
pub async fn save_ingredient_category<'e, E>(
    executor: E,
    category: &IngredientCategory,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO ingredient_categories (id, profile_id, name, description, is_extra)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (id) DO UPDATE SET
            name = excluded.name, description = excluded.description, is_extra = excluded.is_extra",
    )
    .bind(category.id)
    .bind(category.profile_id)
    .bind(&category.name)
    .bind(&category.description)
    .bind(category.is_extra)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_ingredient_category<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM ingredient_categories WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Ingredients ──

pub async fn list_ingredients<'e, E>(
    executor: E,
    profile_id: i64,
) -> Result<Vec<Ingredient>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM ingredients WHERE profile_id = ?1 ORDER BY name")
        .bind(profile_id)
        .fetch_all(executor)
        .await
}

pub async fn find_ingredient<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<Option<Ingredient>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM ingredients WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .fetch_optional(executor)
        .await
}

/// Insert or overwrite an ingredient
pub async fn save_ingredient<'e, E>(executor: E, ingredient: &Ingredient) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO ingredients (id, profile_id, category_id, name, description, price, is_active, is_extra)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (id) DO UPDATE SET
            category_id = excluded.category_id, name = excluded.name,
            description = excluded.description, price = excluded.price,
            is_active = excluded.is_active, is_extra = excluded.is_extra",
    )
    .bind(ingredient.id)
    .bind(ingredient.profile_id)
    .bind(ingredient.category_id)
    .bind(&ingredient.name)
    .bind(&ingredient.description)
    .bind(ingredient.price)
    .bind(ingredient.is_active)
    .bind(ingredient.is_extra)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_ingredient<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Ingredient as seen by order composition, with its category name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngredientRef {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_extra: bool,
    pub category_name: Option<String>,
}

pub async fn find_ingredient_ref<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<Option<IngredientRef>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT i.id, i.name, i.price, i.is_extra, c.name AS category_name
         FROM ingredients i
         LEFT JOIN ingredient_categories c ON c.id = i.category_id
         WHERE i.id = ?1 AND i.profile_id = ?2",
    )
    .bind(id)
    .bind(profile_id)
    .fetch_optional(executor)
    .await
}

// ── Products ──

pub async fn list_products<'e, E>(
    executor: E,
    profile_id: i64,
    active_only: bool,
) -> Result<Vec<Product>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM products
         WHERE profile_id = ?1 AND (?2 = 0 OR is_active = 1)
         ORDER BY name",
    )
    .bind(profile_id)
    .bind(active_only)
    .fetch_all(executor)
    .await
}

pub async fn find_product<'e, E>(
    executor: E,
    profile_id: i64,
    id: i64,
) -> Result<Option<Product>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as("SELECT * FROM products WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .fetch_optional(executor)
        .await
}

/// All associations of every product of a store, keyed by product id
pub async fn associations_by_product<'e, E>(
    executor: E,
    profile_id: i64,
) -> Result<HashMap<i64, Vec<IngredientAssociation>>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<IngredientAssociation> = sqlx::query_as(
        "SELECT pi.* FROM product_ingredients pi
         JOIN products p ON p.id = pi.product_id
         WHERE p.profile_id = ?1
         ORDER BY pi.group_name, pi.id",
    )
    .bind(profile_id)
    .fetch_all(executor)
    .await?;

    let mut map: HashMap<i64, Vec<IngredientAssociation>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row);
    }
    Ok(map)
}

pub async fn list_associations<'e, E>(
    executor: E,
    product_id: i64,
) -> Result<Vec<IngredientAssociation>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM product_ingredients WHERE product_id = ?1 ORDER BY group_name, id",
    )
    .bind(product_id)
    .fetch_all(executor)
    .await
}

/// Insert or overwrite a product; when `associations` is given the product's
/// association list is replaced with it.
pub async fn save_product(
    pool: &SqlitePool,
    product: &Product,
    associations: Option<&[IngredientAssociation]>,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO products (id, profile_id, category_id, name, description, price, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT (id) DO UPDATE SET
            category_id = excluded.category_id, name = excluded.name,
            description = excluded.description, price = excluded.price,
            is_active = excluded.is_active, updated_at = excluded.updated_at",
    )
    .bind(product.id)
    .bind(product.profile_id)
    .bind(product.category_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.is_active)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&mut *tx)
    .await?;

    if let Some(associations) = associations {
        sqlx::query("DELETE FROM product_ingredients WHERE product_id = ?1")
            .bind(product.id)
            .execute(&mut *tx)
            .await?;
        for assoc in associations {
            insert_association(&mut tx, assoc).await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn delete_product<'e, E>(executor: E, profile_id: i64, id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND profile_id = ?2")
        .bind(id)
        .bind(profile_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Associations used during order composition ──

/// Find the association for a product/ingredient pair.
///
/// With `group`, only an association in that group (case-insensitive)
/// matches; without it, the oldest association in any group does.
pub async fn find_association(
    conn: &mut SqliteConnection,
    product_id: i64,
    ingredient_id: i64,
    group: Option<&str>,
) -> Result<Option<IngredientAssociation>, sqlx::Error> {
    match group {
        Some(group) => {
            sqlx::query_as(
                "SELECT * FROM product_ingredients
                 WHERE product_id = ?1 AND ingredient_id = ?2 AND group_name = ?3 COLLATE NOCASE
                 ORDER BY id LIMIT 1",
            )
            .bind(product_id)
            .bind(ingredient_id)
            .bind(group)
            .fetch_optional(&mut *conn)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT * FROM product_ingredients
                 WHERE product_id = ?1 AND ingredient_id = ?2
                 ORDER BY id LIMIT 1",
            )
            .bind(product_id)
            .bind(ingredient_id)
            .fetch_optional(&mut *conn)
            .await
        }
    }
}

pub async fn insert_association(
    conn: &mut SqliteConnection,
    assoc: &IngredientAssociation,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_ingredients (
            id, product_id, ingredient_id, group_name, is_required, max_quantity, price, is_extra
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(assoc.id)
    .bind(assoc.product_id)
    .bind(assoc.ingredient_id)
    .bind(&assoc.group_name)
    .bind(assoc.is_required)
    .bind(assoc.max_quantity)
    .bind(assoc.price)
    .bind(assoc.is_extra)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn mark_association_extra(
    conn: &mut SqliteConnection,
    association_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE product_ingredients SET is_extra = 1 WHERE id = ?1")
        .bind(association_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
