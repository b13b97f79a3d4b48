//! Goods receipt and warehouse stock models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::order::OrderStatus;

/// Goods receipt, one-to-one with a non-draft order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub order_id: Uuid,
    pub receipt_date: NaiveDate,
    pub received_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One product line of a receipt. Several lines may exist for the same
/// product when the delivery is split across expiry dates or batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedLineItem {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub product_id: Uuid,
    pub quantity_received: i32,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

/// Key identifying a warehouse lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LotKey {
    pub product_id: Uuid,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
}

/// A warehouse lot: the authoritative store of on-hand quantity for its key.
/// Created lazily on first receipt, incremented thereafter; never decremented
/// by receipt processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLot {
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

impl InventoryLot {
    pub fn key(&self) -> LotKey {
        LotKey {
            product_id: self.product_id,
            expiry_date: self.expiry_date,
            batch_number: self.batch_number.clone(),
        }
    }

    /// Days remaining before expiry; negative once expired, None when the
    /// lot has no expiry date.
    pub fn days_to_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry_date.map(|d| (d - today).num_days())
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.map_or(false, |d| d < today)
    }

    pub fn is_expiring_within(&self, today: NaiveDate, days: i64) -> bool {
        self.days_to_expiry(today)
            .map_or(false, |remaining| (0..=days).contains(&remaining))
    }
}

/// Failure modes of receipt reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("order is not in a receivable state")]
    OrderNotReceivable,
    #[error("a receipt already exists for this order")]
    ReceiptAlreadyExists,
    #[error("received quantity must be positive")]
    InvalidLineItem,
}

/// One line of an incoming receipt before persistence
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReceiptLine {
    pub product_id: Uuid,
    pub quantity_received: i32,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
}

/// Check that an order can be received and normalize the line items.
///
/// When the caller supplies no lines, a single line covering the full ordered
/// quantity of the order's own product is used. Any non-positive quantity
/// rejects the whole set.
pub fn prepare_receipt_lines(
    status: OrderStatus,
    has_receipt: bool,
    order_product: Uuid,
    ordered_quantity: i32,
    lines: Vec<ReceiptLine>,
) -> Result<Vec<ReceiptLine>, ReceiptError> {
    if !status.is_receivable() {
        return Err(ReceiptError::OrderNotReceivable);
    }
    if has_receipt {
        return Err(ReceiptError::ReceiptAlreadyExists);
    }

    let lines = if lines.is_empty() {
        vec![ReceiptLine {
            product_id: order_product,
            quantity_received: ordered_quantity,
            expiry_date: None,
            batch_number: None,
        }]
    } else {
        lines
    };

    if lines.iter().any(|line| line.quantity_received <= 0) {
        return Err(ReceiptError::InvalidLineItem);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32) -> ReceiptLine {
        ReceiptLine {
            product_id: Uuid::nil(),
            quantity_received: quantity,
            expiry_date: None,
            batch_number: None,
        }
    }

    #[test]
    fn test_prepare_defaults_to_full_order_quantity() {
        let product = Uuid::new_v4();
        let lines =
            prepare_receipt_lines(OrderStatus::Sent, false, product, 40, Vec::new()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, product);
        assert_eq!(lines[0].quantity_received, 40);
    }

    #[test]
    fn test_prepare_rejects_non_receivable_states() {
        for status in [
            OrderStatus::Draft,
            OrderStatus::Received,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(
                prepare_receipt_lines(status, false, Uuid::nil(), 1, Vec::new()),
                Err(ReceiptError::OrderNotReceivable)
            );
        }
    }

    #[test]
    fn test_prepare_rejects_existing_receipt() {
        assert_eq!(
            prepare_receipt_lines(OrderStatus::Shipped, true, Uuid::nil(), 1, Vec::new()),
            Err(ReceiptError::ReceiptAlreadyExists)
        );
    }

    #[test]
    fn test_prepare_rejects_non_positive_quantities() {
        assert_eq!(
            prepare_receipt_lines(
                OrderStatus::Shipped,
                false,
                Uuid::nil(),
                10,
                vec![line(5), line(0)]
            ),
            Err(ReceiptError::InvalidLineItem)
        );
    }

    #[test]
    fn test_expiry_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let lot = InventoryLot {
            id: Uuid::nil(),
            product_id: Uuid::nil(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 20),
            batch_number: None,
            quantity_on_hand: 10,
            unit_cost: None,
            entry_date: today,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(lot.days_to_expiry(today), Some(19));
        assert!(lot.is_expiring_within(today, 30));
        assert!(!lot.is_expiring_within(today, 10));
        assert!(!lot.is_expired(today));
    }
}
