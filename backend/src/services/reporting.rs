//! Reporting service: dashboard aggregation and CSV export
//!
//! Dates in exported rows are rendered through an explicit language
//! parameter; no process-global locale is involved.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{format_date, Language};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_orders: i64,
    pub draft_orders: i64,
    pub awaiting_delivery: i64,
    pub late_orders: i64,
    pub total_stock_units: i64,
    pub low_stock_products: i64,
    pub lots_expiring_30d: i64,
    pub active_vehicles: i64,
    pub documents_expiring_30d: i64,
    pub active_employees: i64,
}

/// One row of the orders export
#[derive(Debug, Serialize, sqlx::FromRow)]
struct OrderExportRow {
    order_number: String,
    product: String,
    supplier: String,
    quantity: i32,
    net_total: Decimal,
    total_with_vat: Decimal,
    status: String,
    expected_arrival: Option<chrono::NaiveDate>,
    date_received: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize)]
struct OrderCsvRecord {
    order_number: String,
    product: String,
    supplier: String,
    quantity: i32,
    net_total: String,
    total_with_vat: String,
    status: String,
    expected_arrival: String,
    date_received: String,
}

/// One row of the inventory export
#[derive(Debug, Serialize, sqlx::FromRow)]
struct InventoryExportRow {
    product: String,
    batch_number: Option<String>,
    expiry_date: Option<chrono::NaiveDate>,
    quantity_on_hand: i64,
    unit_cost: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct InventoryCsvRecord {
    product: String,
    batch_number: String,
    expiry_date: String,
    quantity_on_hand: i64,
    unit_cost: String,
}

/// One row of the fleet costs export
#[derive(Debug, Serialize, sqlx::FromRow)]
struct FleetCostExportRow {
    plate: String,
    total_km: i64,
    average_consumption: Option<Decimal>,
    fuel_cost_per_km: Option<Decimal>,
    yearly_maintenance_cost: Decimal,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let order_counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'draft') AS drafts,
                   COUNT(*) FILTER (WHERE status IN ('sent', 'confirmed', 'in_production',
                                                     'shipped', 'in_transit')) AS awaiting,
                   COUNT(*) FILTER (WHERE expected_arrival < CURRENT_DATE
                                    AND status NOT IN ('received', 'completed', 'cancelled')) AS late
            FROM orders
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_stock: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity_on_hand), 0)::BIGINT FROM inventory_lots",
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM (
                SELECT p.id
                FROM products p
                LEFT JOIN inventory_lots l ON l.product_id = p.id
                WHERE p.is_active = true
                GROUP BY p.id, p.min_stock
                HAVING COALESCE(SUM(l.quantity_on_hand), 0) <= p.min_stock
                   AND COALESCE(SUM(l.quantity_on_hand), 0) > 0
            ) AS low
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let expiring_lots: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inventory_lots
            WHERE quantity_on_hand > 0
              AND expiry_date IS NOT NULL
              AND expiry_date BETWEEN CURRENT_DATE AND CURRENT_DATE + INTERVAL '30 days'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let active_vehicles: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE is_active = true")
                .fetch_one(&self.db)
                .await?;

        let expiring_documents: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM vehicle_documents
            WHERE expiry_date BETWEEN CURRENT_DATE AND CURRENT_DATE + INTERVAL '30 days'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let active_employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE is_active = true")
                .fetch_one(&self.db)
                .await?;

        Ok(DashboardMetrics {
            total_orders: order_counts.0,
            draft_orders: order_counts.1,
            awaiting_delivery: order_counts.2,
            late_orders: order_counts.3,
            total_stock_units: total_stock,
            low_stock_products: low_stock,
            lots_expiring_30d: expiring_lots,
            active_vehicles,
            documents_expiring_30d: expiring_documents,
            active_employees,
        })
    }

    /// Export orders as CSV
    pub async fn export_orders_csv(&self, language: Language) -> AppResult<String> {
        let rows = sqlx::query_as::<_, OrderExportRow>(
            r#"
            SELECT o.order_number, p.name AS product, s.name AS supplier, o.quantity,
                   o.net_total, o.total_with_vat, o.status, o.expected_arrival, o.date_received
            FROM orders o
            JOIN products p ON p.id = o.product_id
            JOIN suppliers s ON s.id = o.supplier_id
            ORDER BY o.order_number
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let records: Vec<OrderCsvRecord> = rows
            .into_iter()
            .map(|row| OrderCsvRecord {
                order_number: row.order_number,
                product: row.product,
                supplier: row.supplier,
                quantity: row.quantity,
                net_total: row.net_total.to_string(),
                total_with_vat: row.total_with_vat.to_string(),
                status: row.status,
                expected_arrival: row
                    .expected_arrival
                    .map(|d| format_date(d, language))
                    .unwrap_or_default(),
                date_received: row
                    .date_received
                    .map(|d| format_date(d, language))
                    .unwrap_or_default(),
            })
            .collect();

        Self::export_to_csv(&records)
    }

    /// Export warehouse stock as CSV
    pub async fn export_inventory_csv(&self, language: Language) -> AppResult<String> {
        let rows = sqlx::query_as::<_, InventoryExportRow>(
            r#"
            SELECT p.name AS product, l.batch_number, l.expiry_date,
                   l.quantity_on_hand, l.unit_cost
            FROM inventory_lots l
            JOIN products p ON p.id = l.product_id
            WHERE l.quantity_on_hand > 0
            ORDER BY p.name, l.expiry_date NULLS LAST
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let records: Vec<InventoryCsvRecord> = rows
            .into_iter()
            .map(|row| InventoryCsvRecord {
                product: row.product,
                batch_number: row.batch_number.unwrap_or_default(),
                expiry_date: row
                    .expiry_date
                    .map(|d| format_date(d, language))
                    .unwrap_or_default(),
                quantity_on_hand: row.quantity_on_hand,
                unit_cost: row
                    .unit_cost
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Self::export_to_csv(&records)
    }

    /// Export per-vehicle cost statistics as CSV
    pub async fn export_fleet_costs_csv(&self) -> AppResult<String> {
        let rows = sqlx::query_as::<_, FleetCostExportRow>(
            r#"
            SELECT v.plate, COALESCE(s.total_km, 0) AS total_km, s.average_consumption,
                   s.fuel_cost_per_km, COALESCE(s.yearly_maintenance_cost, 0) AS yearly_maintenance_cost
            FROM vehicles v
            LEFT JOIN vehicle_statistics s ON s.vehicle_id = v.id
            WHERE v.is_active = true
            ORDER BY v.plate
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Self::export_to_csv(&rows)
    }

    /// Serialize records as CSV
    fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
