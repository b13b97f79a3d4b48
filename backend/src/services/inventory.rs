//! Warehouse inventory read side
//!
//! Lots are created and incremented by receipt reconciliation only; this
//! service exposes balances, expiry windows and low-stock views.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::InventoryLot;

/// Inventory service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
pub(crate) struct LotRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub quantity_on_hand: i64,
    pub unit_cost: Option<Decimal>,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) const LOT_COLUMNS: &str = "id, product_id, expiry_date, batch_number, \
                                      quantity_on_hand, unit_cost, entry_date, created_at, updated_at";

impl LotRow {
    pub(crate) fn into_lot(self) -> InventoryLot {
        InventoryLot {
            id: self.id,
            product_id: self.product_id,
            expiry_date: self.expiry_date,
            batch_number: self.batch_number,
            quantity_on_hand: self.quantity_on_hand,
            unit_cost: self.unit_cost,
            entry_date: self.entry_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A lot joined with its product name
#[derive(Debug, Serialize)]
pub struct LotWithProduct {
    #[serde(flatten)]
    pub lot: InventoryLot,
    pub product_name: String,
}

/// On-hand total for one product across lots
#[derive(Debug, Serialize, FromRow)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub product_name: String,
    pub min_stock: i32,
    pub max_stock: i32,
    pub total_on_hand: i64,
}

#[derive(Debug, FromRow)]
struct LotWithProductRow {
    id: Uuid,
    product_id: Uuid,
    expiry_date: Option<NaiveDate>,
    batch_number: Option<String>,
    quantity_on_hand: i64,
    unit_cost: Option<Decimal>,
    entry_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_name: String,
}

impl LotWithProductRow {
    fn into_view(self) -> LotWithProduct {
        LotWithProduct {
            lot: InventoryLot {
                id: self.id,
                product_id: self.product_id,
                expiry_date: self.expiry_date,
                batch_number: self.batch_number,
                quantity_on_hand: self.quantity_on_hand,
                unit_cost: self.unit_cost,
                entry_date: self.entry_date,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            product_name: self.product_name,
        }
    }
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List lots with stock on hand
    pub async fn list_lots(&self) -> AppResult<Vec<LotWithProduct>> {
        let rows = sqlx::query_as::<_, LotWithProductRow>(
            r#"
            SELECT l.id, l.product_id, l.expiry_date, l.batch_number, l.quantity_on_hand,
                   l.unit_cost, l.entry_date, l.created_at, l.updated_at,
                   p.name AS product_name
            FROM inventory_lots l
            JOIN products p ON p.id = l.product_id
            WHERE l.quantity_on_hand > 0
            ORDER BY p.name, l.expiry_date NULLS LAST
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LotWithProductRow::into_view).collect())
    }

    /// Get a lot by id
    pub async fn get_lot(&self, lot_id: Uuid) -> AppResult<InventoryLot> {
        let row = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {} FROM inventory_lots WHERE id = $1",
            LOT_COLUMNS
        ))
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        Ok(row.into_lot())
    }

    /// Lots expiring within the given number of days (default 30)
    pub async fn list_expiring_lots(&self, days: Option<i64>) -> AppResult<Vec<LotWithProduct>> {
        let days = days.unwrap_or(30);
        let today = Utc::now().date_naive();

        let rows = sqlx::query_as::<_, LotWithProductRow>(
            r#"
            SELECT l.id, l.product_id, l.expiry_date, l.batch_number, l.quantity_on_hand,
                   l.unit_cost, l.entry_date, l.created_at, l.updated_at,
                   p.name AS product_name
            FROM inventory_lots l
            JOIN products p ON p.id = l.product_id
            WHERE l.quantity_on_hand > 0
              AND l.expiry_date IS NOT NULL
              AND l.expiry_date >= $1
              AND l.expiry_date <= $2
            ORDER BY l.expiry_date
            "#,
        )
        .bind(today)
        .bind(today + chrono::Duration::days(days))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LotWithProductRow::into_view).collect())
    }

    /// Lots already past their expiry date with stock remaining
    pub async fn list_expired_lots(&self) -> AppResult<Vec<LotWithProduct>> {
        let today = Utc::now().date_naive();

        let rows = sqlx::query_as::<_, LotWithProductRow>(
            r#"
            SELECT l.id, l.product_id, l.expiry_date, l.batch_number, l.quantity_on_hand,
                   l.unit_cost, l.entry_date, l.created_at, l.updated_at,
                   p.name AS product_name
            FROM inventory_lots l
            JOIN products p ON p.id = l.product_id
            WHERE l.quantity_on_hand > 0
              AND l.expiry_date IS NOT NULL
              AND l.expiry_date < $1
            ORDER BY l.expiry_date
            "#,
        )
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LotWithProductRow::into_view).collect())
    }

    /// Products whose total on-hand stock is at or below their minimum
    /// threshold (but not empty)
    pub async fn list_low_stock(&self) -> AppResult<Vec<ProductStock>> {
        let rows = sqlx::query_as::<_, ProductStock>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name,
                   p.min_stock, p.max_stock,
                   COALESCE(SUM(l.quantity_on_hand), 0)::BIGINT AS total_on_hand
            FROM products p
            LEFT JOIN inventory_lots l ON l.product_id = p.id
            WHERE p.is_active = true
            GROUP BY p.id, p.name, p.min_stock, p.max_stock
            HAVING COALESCE(SUM(l.quantity_on_hand), 0) <= p.min_stock
               AND COALESCE(SUM(l.quantity_on_hand), 0) > 0
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// On-hand totals per product
    pub async fn stock_summary(&self) -> AppResult<Vec<ProductStock>> {
        let rows = sqlx::query_as::<_, ProductStock>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name,
                   p.min_stock, p.max_stock,
                   COALESCE(SUM(l.quantity_on_hand), 0)::BIGINT AS total_on_hand
            FROM products p
            LEFT JOIN inventory_lots l ON l.product_id = p.id
            WHERE p.is_active = true
            GROUP BY p.id, p.name, p.min_stock, p.max_stock
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
