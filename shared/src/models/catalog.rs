//! Catalog Models: categories, products, ingredients and their associations

use serde::{Deserialize, Serialize};

// ── Category ──

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

// ── Ingredient Category ──

/// Grouping of ingredients (e.g. "Sauces", "Cheeses")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct IngredientCategory {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_extra: bool,
}

/// Create ingredient category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub is_extra: Option<bool>,
}

/// Update ingredient category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientCategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_extra: Option<bool>,
}

// ── Ingredient ──

/// Ingredient entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub profile_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    /// Base price, used when no group-specific price applies
    pub price: f64,
    pub is_active: bool,
    /// Globally flagged as a paid extra
    pub is_extra: bool,
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
    pub is_extra: Option<bool>,
}

/// Update ingredient payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
    pub is_extra: Option<bool>,
}

// ── Product ──

/// Link between a product and an ingredient inside a named group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct IngredientAssociation {
    pub id: i64,
    pub product_id: i64,
    pub ingredient_id: i64,
    pub group_name: String,
    pub is_required: bool,
    pub max_quantity: i32,
    /// Group-specific price; falls back to the ingredient price when absent
    pub price: Option<f64>,
    pub is_extra: bool,
}

/// Association as submitted with a product create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationInput {
    pub ingredient_id: i64,
    pub group_name: String,
    #[serde(default)]
    pub is_required: bool,
    pub max_quantity: Option<i32>,
    pub price: Option<f64>,
    #[serde(default)]
    pub is_extra: bool,
}

/// Product (catalog item) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub profile_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub associations: Vec<IngredientAssociation>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: i64,
    pub description: Option<String>,
    pub price: f64,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub associations: Vec<AssociationInput>,
}

/// Update product payload; `associations` replaces the whole list when present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
    pub associations: Option<Vec<AssociationInput>>,
}

/// Storefront category with its active products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}
