//! Goods receipt reconciliation
//!
//! Receiving an order creates the receipt, allocates the received
//! quantities into warehouse lots and moves the order to `received`, all
//! inside one transaction. The one-to-one constraint between receipts and
//! orders is the concurrency guard: a second reconciliation attempt fails
//! instead of double-counting stock.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{LotRow, LOT_COLUMNS};
use shared::{
    prepare_receipt_lines, InventoryLot, OrderStatus, Receipt, ReceiptError, ReceiptLine,
    ReceivedLineItem,
};

/// Receipt service
#[derive(Clone)]
pub struct ReceiptService {
    db: PgPool,
}

/// Input for receiving an order. With no lines, the full ordered quantity
/// of the order's product is received as a single lot.
#[derive(Debug, Deserialize)]
pub struct ReceiveOrderInput {
    pub receipt_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<ReceiptLine>,
}

/// Outcome of a reconciliation
#[derive(Debug, Serialize)]
pub struct ReceiptDetail {
    pub receipt: Receipt,
    pub lines: Vec<ReceivedLineItem>,
    /// Lots created or incremented by this receipt
    pub lots: Vec<InventoryLot>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderForReceipt {
    product_id: Uuid,
    quantity: i32,
    status: String,
    unit_price: Decimal,
    discount_percent: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: Uuid,
    order_id: Uuid,
    receipt_date: NaiveDate,
    received_by: Option<Uuid>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl ReceiptRow {
    fn into_receipt(self) -> Receipt {
        Receipt {
            id: self.id,
            order_id: self.order_id,
            receipt_date: self.receipt_date,
            received_by: self.received_by,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

impl ReceiptService {
    /// Create a new ReceiptService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Reconcile an order's goods receipt into the warehouse.
    ///
    /// All-or-nothing: any failure rolls the whole reconciliation back.
    pub async fn receive_order(
        &self,
        order_id: Uuid,
        received_by: Uuid,
        input: ReceiveOrderInput,
    ) -> AppResult<ReceiptDetail> {
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, OrderForReceipt>(
            r#"
            SELECT product_id, quantity, status, unit_price, discount_percent
            FROM orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let status = OrderStatus::from_str(&order.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown order status {}", order.status)))?;

        let has_receipt = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM receipts WHERE order_id = $1)",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        let lines = prepare_receipt_lines(
            status,
            has_receipt,
            order.product_id,
            order.quantity,
            input.lines,
        )?;

        let receipt_date = input
            .receipt_date
            .unwrap_or_else(|| Utc::now().date_naive());

        // The UNIQUE(order_id) constraint is the source of truth under
        // concurrent double submission.
        let receipt_row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO receipts (order_id, receipt_date, received_by, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, receipt_date, received_by, notes, created_at
            "#,
        )
        .bind(order_id)
        .bind(receipt_date)
        .bind(received_by)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Receipt(ReceiptError::ReceiptAlreadyExists)
            }
            _ => AppError::DatabaseError(err),
        })?;

        let discounted_unit_price =
            order.unit_price * (Decimal::ONE - order.discount_percent / Decimal::ONE_HUNDRED);

        let mut line_items = Vec::with_capacity(lines.len());
        let mut lots = Vec::with_capacity(lines.len());

        for line in &lines {
            let line_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO received_line_items (receipt_id, product_id, quantity_received,
                                                 expiry_date, batch_number)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(receipt_row.id)
            .bind(line.product_id)
            .bind(line.quantity_received)
            .bind(line.expiry_date)
            .bind(&line.batch_number)
            .fetch_one(&mut *tx)
            .await?;

            line_items.push(ReceivedLineItem {
                id: line_id,
                receipt_id: receipt_row.id,
                product_id: line.product_id,
                quantity_received: line.quantity_received,
                expiry_date: line.expiry_date,
                batch_number: line.batch_number.clone(),
                notes: None,
            });

            // Unit cost is recorded on first creation of the lot only, and
            // only for the ordered product itself
            let unit_cost = if line.product_id == order.product_id {
                Some(discounted_unit_price)
            } else {
                None
            };

            let lot_row = sqlx::query_as::<_, LotRow>(&format!(
                r#"
                INSERT INTO inventory_lots (product_id, expiry_date, batch_number,
                                            quantity_on_hand, unit_cost, entry_date)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (product_id, expiry_date, batch_number)
                DO UPDATE SET quantity_on_hand = inventory_lots.quantity_on_hand
                              + EXCLUDED.quantity_on_hand,
                              updated_at = NOW()
                RETURNING {}
                "#,
                LOT_COLUMNS
            ))
            .bind(line.product_id)
            .bind(line.expiry_date)
            .bind(&line.batch_number)
            .bind(i64::from(line.quantity_received))
            .bind(unit_cost)
            .bind(receipt_date)
            .fetch_one(&mut *tx)
            .await?;

            lots.push(lot_row.into_lot());
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET status = 'received', date_received = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(receipt_date)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Order {} received: {} line(s) reconciled into inventory",
            order_id,
            line_items.len()
        );

        Ok(ReceiptDetail {
            receipt: receipt_row.into_receipt(),
            lines: line_items,
            lots,
        })
    }

    /// Get the receipt for an order, with its line items
    pub async fn get_receipt_for_order(&self, order_id: Uuid) -> AppResult<ReceiptDetail> {
        let receipt_row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, order_id, receipt_date, received_by, notes, created_at
            FROM receipts
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Receipt".to_string()))?;

        let lines = sqlx::query_as::<_, (Uuid, Uuid, Uuid, i32, Option<NaiveDate>, Option<String>, Option<String>)>(
            r#"
            SELECT id, receipt_id, product_id, quantity_received, expiry_date, batch_number, notes
            FROM received_line_items
            WHERE receipt_id = $1
            ORDER BY id
            "#,
        )
        .bind(receipt_row.id)
        .fetch_all(&self.db)
        .await?;

        Ok(ReceiptDetail {
            receipt: receipt_row.into_receipt(),
            lines: lines
                .into_iter()
                .map(|row| ReceivedLineItem {
                    id: row.0,
                    receipt_id: row.1,
                    product_id: row.2,
                    quantity_received: row.3,
                    expiry_date: row.4,
                    batch_number: row.5,
                    notes: row.6,
                })
                .collect(),
            lots: Vec::new(),
        })
    }

    /// List receipts, newest first
    pub async fn list_receipts(&self) -> AppResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, order_id, receipt_date, received_by, notes, created_at
            FROM receipts
            ORDER BY receipt_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ReceiptRow::into_receipt).collect())
    }
}
