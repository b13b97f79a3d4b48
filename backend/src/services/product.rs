//! Product catalog service
//!
//! Products referenced by orders or warehouse lots are deactivated rather
//! than deleted.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_ean13, Category, MeasurementUnit, Product, VatRate};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating or updating a category
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

/// Input for creating or updating a product
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub ean: String,
    pub internal_code: Option<String>,
    pub unit: MeasurementUnit,
    pub vat_rate: VatRate,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
}

type ProductRow = (
    Uuid,
    Uuid,
    String,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
    i32,
    i32,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

const PRODUCT_COLUMNS: &str = "id, category_id, name, description, ean, internal_code, unit, \
                              vat_rate, min_stock, max_stock, is_active, created_at, updated_at";

fn product_from_row(row: ProductRow) -> Product {
    Product {
        id: row.0,
        category_id: row.1,
        name: row.2,
        description: row.3,
        ean: row.4,
        internal_code: row.5,
        unit: MeasurementUnit::from_str(&row.6).unwrap_or(MeasurementUnit::Package),
        vat_rate: VatRate::from_str(&row.7).unwrap_or(VatRate::TwentyTwo),
        min_stock: row.8,
        max_stock: row.9,
        is_active: row.10,
        created_at: row.11,
        updated_at: row.12,
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Create a category
    pub async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE name = $1")
                .bind(&input.name)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }

        let row = sqlx::query_as::<_, (Uuid, String, Option<String>, bool, i32, DateTime<Utc>, DateTime<Utc>)>(
            r#"
            INSERT INTO categories (name, description, sort_order)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, is_active, sort_order, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.sort_order.unwrap_or(0))
        .fetch_one(&self.db)
        .await?;

        Ok(Category {
            id: row.0,
            name: row.1,
            description: row.2,
            is_active: row.3,
            sort_order: row.4,
            created_at: row.5,
            updated_at: row.6,
        })
    }

    /// List categories in display order
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, bool, i32, DateTime<Utc>, DateTime<Utc>)>(
            r#"
            SELECT id, name, description, is_active, sort_order, created_at, updated_at
            FROM categories
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.0,
                name: row.1,
                description: row.2,
                is_active: row.3,
                sort_order: row.4,
                created_at: row.5,
                updated_at: row.6,
            })
            .collect())
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Create a product
    pub async fn create_product(&self, input: ProductInput) -> AppResult<Product> {
        validate_ean13(&input.ean).map_err(|_| AppError::InvalidFormat {
            field: "ean".to_string(),
        })?;

        let ean_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE ean = $1")
                .bind(&input.ean)
                .fetch_one(&self.db)
                .await?;

        if ean_taken > 0 {
            return Err(AppError::DuplicateEntry("ean".to_string()));
        }

        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        if !category_exists {
            return Err(AppError::NotFound("Category".to_string()));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (category_id, name, description, ean, internal_code,
                                  unit, vat_rate, min_stock, max_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.ean)
        .bind(&input.internal_code)
        .bind(input.unit.as_str())
        .bind(input.vat_rate.as_str())
        .bind(input.min_stock.unwrap_or(0))
        .bind(input.max_stock.unwrap_or(0))
        .fetch_one(&self.db)
        .await?;

        Ok(product_from_row(row))
    }

    /// List products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(product_from_row).collect())
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product_from_row(row))
    }

    /// Update a product
    pub async fn update_product(&self, product_id: Uuid, input: ProductInput) -> AppResult<Product> {
        validate_ean13(&input.ean).map_err(|_| AppError::InvalidFormat {
            field: "ean".to_string(),
        })?;

        let ean_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE ean = $1 AND id <> $2",
        )
        .bind(&input.ean)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if ean_taken > 0 {
            return Err(AppError::DuplicateEntry("ean".to_string()));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET category_id = $1, name = $2, description = $3, ean = $4,
                internal_code = $5, unit = $6, vat_rate = $7, min_stock = $8,
                max_stock = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.ean)
        .bind(&input.internal_code)
        .bind(input.unit.as_str())
        .bind(input.vat_rate.as_str())
        .bind(input.min_stock.unwrap_or(0))
        .bind(input.max_stock.unwrap_or(0))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product_from_row(row))
    }

    /// Deactivate a product. Products referenced by orders or lots are
    /// soft-disabled, never deleted.
    pub async fn deactivate_product(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}
