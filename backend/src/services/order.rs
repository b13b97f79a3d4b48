//! Purchase order service
//!
//! Totals are always derived from the pricing inputs through the shared
//! pricing engine, never edited directly. Order numbers are assigned once,
//! inside the same transaction as the insert.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    compute_order_totals, format_order_number, validate_status_change, MeasurementUnit, Order,
    OrderStatus, PricingInput, VatRate,
};

/// Purchase order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    /// Defaults to the product's own measurement unit
    pub unit: Option<MeasurementUnit>,
    pub units_per_package: Option<Decimal>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub expected_arrival: Option<NaiveDate>,
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
}

/// Input for editing a draft order's pricing fields
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub units_per_package: Option<Decimal>,
    pub expected_arrival: Option<NaiveDate>,
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
}

/// Input for a user-facing status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
    pub date_sent: Option<NaiveDate>,
}

/// Order listing filter
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub supplier_id: Option<Uuid>,
    pub late_only: Option<bool>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    product_id: Uuid,
    supplier_id: Uuid,
    unit: String,
    units_per_package: Option<Decimal>,
    quantity: i32,
    unit_price: Decimal,
    discount_percent: Decimal,
    net_total: Decimal,
    total_with_vat: Decimal,
    status: String,
    date_sent: Option<NaiveDate>,
    expected_arrival: Option<NaiveDate>,
    date_received: Option<NaiveDate>,
    internal_notes: Option<String>,
    supplier_notes: Option<String>,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const ORDER_COLUMNS: &str = "id, order_number, product_id, supplier_id, unit, units_per_package, \
                            quantity, unit_price, discount_percent, net_total, total_with_vat, \
                            status, date_sent, expected_arrival, date_received, internal_notes, \
                            supplier_notes, created_by, created_at, updated_at";

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            product_id: self.product_id,
            supplier_id: self.supplier_id,
            unit: MeasurementUnit::from_str(&self.unit).unwrap_or(MeasurementUnit::Package),
            units_per_package: self.units_per_package,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount_percent: self.discount_percent,
            net_total: self.net_total,
            total_with_vat: self.total_with_vat,
            status: OrderStatus::from_str(&self.status).unwrap_or(OrderStatus::Draft),
            date_sent: self.date_sent,
            expected_arrival: self.expected_arrival,
            date_received: self.date_received,
            internal_notes: self.internal_notes,
            supplier_notes: self.supplier_notes,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Product fields needed for pricing
#[derive(Debug, sqlx::FromRow)]
struct ProductPricingRow {
    unit: String,
    vat_rate: String,
    is_active: bool,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order in draft state.
    ///
    /// The per-year numbering counter advances atomically in the same
    /// transaction as the insert, so concurrent creations never share a
    /// number.
    pub async fn create_order(
        &self,
        created_by: Uuid,
        input: CreateOrderInput,
    ) -> AppResult<Order> {
        let product = sqlx::query_as::<_, ProductPricingRow>(
            "SELECT unit, vat_rate, is_active FROM products WHERE id = $1",
        )
        .bind(input.product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if !product.is_active {
            return Err(AppError::Validation {
                field: "product_id".to_string(),
                message: "Product is no longer active".to_string(),
                message_it: "Il prodotto non è più attivo".to_string(),
            });
        }

        let supplier_active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1 AND is_active = true)",
        )
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        if !supplier_active {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let unit = input
            .unit
            .or_else(|| MeasurementUnit::from_str(&product.unit))
            .unwrap_or(MeasurementUnit::Package);
        let vat_rate = VatRate::from_str(&product.vat_rate).unwrap_or(VatRate::TwentyTwo);
        let discount_percent = input.discount_percent.unwrap_or(Decimal::ZERO);

        // The VAT rate comes from the product, never from the caller
        let totals = compute_order_totals(&PricingInput {
            unit_price: input.unit_price,
            quantity: input.quantity,
            discount_percent,
            unit,
            units_per_package: input.units_per_package,
            vat_rate,
        })?;

        let mut tx = self.db.begin().await?;

        let year = Utc::now().year();
        let sequence: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO order_number_sequences (year, last_value)
            VALUES ($1, 1)
            ON CONFLICT (year)
            DO UPDATE SET last_value = order_number_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;

        let order_number = format_order_number(year, sequence);

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (order_number, product_id, supplier_id, unit,
                                units_per_package, quantity, unit_price, discount_percent,
                                net_total, total_with_vat, status, expected_arrival,
                                internal_notes, supplier_notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'draft', $11, $12, $13, $14)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(&order_number)
        .bind(input.product_id)
        .bind(input.supplier_id)
        .bind(unit.as_str())
        .bind(input.units_per_package)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(discount_percent)
        .bind(totals.net_total)
        .bind(totals.total_with_vat)
        .bind(input.expected_arrival)
        .bind(&input.internal_notes)
        .bind(&input.supplier_notes)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Created order {}", order_number);

        Ok(row.into_order())
    }

    /// Edit a draft order. Pricing fields are frozen once the order leaves
    /// draft; totals are recomputed from the new inputs.
    pub async fn update_order(&self, order_id: Uuid, input: UpdateOrderInput) -> AppResult<Order> {
        let current = self.get_order(order_id).await?;

        if !current.status.is_editable() {
            return Err(AppError::Conflict {
                resource: "order".to_string(),
                message: "Pricing fields can only be changed while the order is a draft"
                    .to_string(),
                message_it: "I campi di prezzo sono modificabili solo in bozza".to_string(),
            });
        }

        let product = sqlx::query_as::<_, ProductPricingRow>(
            "SELECT unit, vat_rate, is_active FROM products WHERE id = $1",
        )
        .bind(current.product_id)
        .fetch_one(&self.db)
        .await?;

        let vat_rate = VatRate::from_str(&product.vat_rate).unwrap_or(VatRate::TwentyTwo);
        let discount_percent = input.discount_percent.unwrap_or(Decimal::ZERO);

        let totals = compute_order_totals(&PricingInput {
            unit_price: input.unit_price,
            quantity: input.quantity,
            discount_percent,
            unit: current.unit,
            units_per_package: input.units_per_package,
            vat_rate,
        })?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET quantity = $1, unit_price = $2, discount_percent = $3,
                units_per_package = $4, net_total = $5, total_with_vat = $6,
                expected_arrival = $7, internal_notes = $8, supplier_notes = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(discount_percent)
        .bind(input.units_per_package)
        .bind(totals.net_total)
        .bind(totals.total_with_vat)
        .bind(input.expected_arrival)
        .bind(&input.internal_notes)
        .bind(&input.supplier_notes)
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_order())
    }

    /// Apply a user-facing status change.
    ///
    /// `Received` is not a valid target here: it is entered only by receipt
    /// reconciliation.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<Order> {
        let current = self.get_order(order_id).await?;
        let date_sent = input.date_sent.or(current.date_sent);

        // Totals are computed at creation and are never null in this schema
        validate_status_change(current.status, input.status, date_sent, true)?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET status = $1, date_sent = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(input.status.as_str())
        .bind(date_sent)
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            "Order {} moved from {} to {}",
            current.order_number,
            current.status,
            input.status
        );

        Ok(row.into_order())
    }

    /// Cancel an order (allowed from any non-terminal state)
    pub async fn cancel_order(&self, order_id: Uuid) -> AppResult<Order> {
        self.update_status(
            order_id,
            UpdateStatusInput {
                status: OrderStatus::Cancelled,
                date_sent: None,
            },
        )
        .await
    }

    /// Get an order by id
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        Ok(row.into_order())
    }

    /// List orders, optionally filtered by status, supplier or lateness
    pub async fn list_orders(&self, filter: OrderFilter) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {}
            FROM orders
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR supplier_id = $2)
            ORDER BY created_at DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.supplier_id)
        .fetch_all(&self.db)
        .await?;

        let mut orders: Vec<Order> = rows.into_iter().map(OrderRow::into_order).collect();

        if filter.late_only.unwrap_or(false) {
            let today = Utc::now().date_naive();
            orders.retain(|order| order.is_late(today));
        }

        Ok(orders)
    }

    /// List orders still waiting for goods
    pub async fn list_receivable_orders(&self) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {}
            FROM orders
            WHERE status IN ('sent', 'confirmed', 'in_production', 'shipped', 'in_transit')
            ORDER BY expected_arrival NULLS LAST, created_at
            "#,
            ORDER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }
}
