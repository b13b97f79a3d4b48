//! Receipt reconciliation tests
//!
//! Exercises line normalization and the lot allocation behavior through an
//! in-memory warehouse, including the exactly-once law.

use chrono::NaiveDate;
use proptest::prelude::*;
use shared::{prepare_receipt_lines, LotKey, OrderStatus, ReceiptError, ReceiptLine};
use std::collections::HashMap;
use uuid::Uuid;

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 1, d)
}

fn line(
    product_id: Uuid,
    quantity: i32,
    expiry: Option<NaiveDate>,
    batch: Option<&str>,
) -> ReceiptLine {
    ReceiptLine {
        product_id,
        quantity_received: quantity,
        expiry_date: expiry,
        batch_number: batch.map(|b| b.to_string()),
    }
}

// ============================================================================
// In-memory warehouse used to exercise the reconciliation contract
// ============================================================================

#[derive(Default)]
struct Warehouse {
    lots: HashMap<LotKey, i64>,
    received_orders: HashMap<Uuid, OrderStatus>,
}

impl Warehouse {
    /// Mirror of the service-side reconciliation: normalize lines, guard the
    /// one-receipt-per-order rule, then increment lots.
    fn receive(
        &mut self,
        order_id: Uuid,
        status: OrderStatus,
        order_product: Uuid,
        ordered_quantity: i32,
        lines: Vec<ReceiptLine>,
    ) -> Result<(), ReceiptError> {
        let has_receipt = self.received_orders.contains_key(&order_id);
        let lines =
            prepare_receipt_lines(status, has_receipt, order_product, ordered_quantity, lines)?;

        for item in &lines {
            let key = LotKey {
                product_id: item.product_id,
                expiry_date: item.expiry_date,
                batch_number: item.batch_number.clone(),
            };
            *self.lots.entry(key).or_insert(0) += i64::from(item.quantity_received);
        }

        self.received_orders.insert(order_id, OrderStatus::Received);
        Ok(())
    }

    fn total_on_hand(&self) -> i64 {
        self.lots.values().sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Exactly-once law: the first receipt lands, the second fails and
    /// leaves the stock untouched.
    #[test]
    fn test_receiving_twice_fails_without_double_counting() {
        let mut warehouse = Warehouse::default();
        let order = Uuid::new_v4();
        let product = Uuid::new_v4();

        warehouse
            .receive(order, OrderStatus::Shipped, product, 40, Vec::new())
            .unwrap();
        assert_eq!(warehouse.total_on_hand(), 40);

        let second = warehouse.receive(order, OrderStatus::Shipped, product, 40, Vec::new());
        assert_eq!(second, Err(ReceiptError::ReceiptAlreadyExists));
        assert_eq!(warehouse.total_on_hand(), 40);
    }

    /// Split deliveries of the same product land in distinct lots keyed by
    /// expiry and batch.
    #[test]
    fn test_split_lots_by_expiry_and_batch() {
        let mut warehouse = Warehouse::default();
        let order = Uuid::new_v4();
        let product = Uuid::new_v4();

        warehouse
            .receive(
                order,
                OrderStatus::InTransit,
                product,
                30,
                vec![
                    line(product, 10, day(10), Some("A1")),
                    line(product, 12, day(20), Some("A2")),
                    line(product, 8, None, None),
                ],
            )
            .unwrap();

        assert_eq!(warehouse.lots.len(), 3);
        assert_eq!(warehouse.total_on_hand(), 30);
    }

    /// Receiving the same lot key across two orders accumulates instead of
    /// creating a duplicate.
    #[test]
    fn test_same_lot_key_accumulates() {
        let mut warehouse = Warehouse::default();
        let product = Uuid::new_v4();

        warehouse
            .receive(
                Uuid::new_v4(),
                OrderStatus::Sent,
                product,
                10,
                vec![line(product, 10, day(15), Some("B7"))],
            )
            .unwrap();
        warehouse
            .receive(
                Uuid::new_v4(),
                OrderStatus::Sent,
                product,
                5,
                vec![line(product, 5, day(15), Some("B7"))],
            )
            .unwrap();

        assert_eq!(warehouse.lots.len(), 1);
        assert_eq!(warehouse.total_on_hand(), 15);
    }

    #[test]
    fn test_draft_and_terminal_orders_are_not_receivable() {
        let mut warehouse = Warehouse::default();
        let product = Uuid::new_v4();

        for status in [
            OrderStatus::Draft,
            OrderStatus::Received,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let result = warehouse.receive(Uuid::new_v4(), status, product, 10, Vec::new());
            assert_eq!(result, Err(ReceiptError::OrderNotReceivable));
        }
        assert_eq!(warehouse.total_on_hand(), 0);
    }

    /// A bad line item aborts the whole reconciliation; no partial
    /// application.
    #[test]
    fn test_invalid_line_rejects_whole_receipt() {
        let mut warehouse = Warehouse::default();
        let order = Uuid::new_v4();
        let product = Uuid::new_v4();

        let result = warehouse.receive(
            order,
            OrderStatus::Shipped,
            product,
            20,
            vec![line(product, 15, day(5), None), line(product, 0, None, None)],
        );

        assert_eq!(result, Err(ReceiptError::InvalidLineItem));
        assert_eq!(warehouse.total_on_hand(), 0);
        // The order can still be received afterwards with valid lines
        assert!(warehouse
            .receive(order, OrderStatus::Shipped, product, 20, Vec::new())
            .is_ok());
    }

    #[test]
    fn test_default_line_covers_full_order() {
        let product = Uuid::new_v4();
        let lines =
            prepare_receipt_lines(OrderStatus::Confirmed, false, product, 25, Vec::new()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity_received, 25);
        assert_eq!(lines[0].product_id, product);
        assert_eq!(lines[0].expiry_date, None);
        assert_eq!(lines[0].batch_number, None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn lines_strategy() -> impl Strategy<Value = Vec<(i32, Option<u32>, Option<String>)>> {
        prop::collection::vec(
            (
                1i32..=500,
                prop::option::of(1u32..=28),
                prop::option::of("[A-Z][0-9]{2}"),
            ),
            1..8,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stock gained by one receipt equals the sum of its line
        /// quantities, however the lines are split across lot keys.
        #[test]
        fn prop_receipt_conserves_quantity(raw_lines in lines_strategy()) {
            let mut warehouse = Warehouse::default();
            let product = Uuid::new_v4();
            let expected: i64 = raw_lines.iter().map(|(q, _, _)| i64::from(*q)).sum();

            let lines: Vec<ReceiptLine> = raw_lines
                .into_iter()
                .map(|(quantity, expiry, batch)| line(
                    product,
                    quantity,
                    expiry.and_then(day),
                    batch.as_deref(),
                ))
                .collect();

            warehouse
                .receive(Uuid::new_v4(), OrderStatus::Sent, product, 1, lines)
                .unwrap();

            prop_assert_eq!(warehouse.total_on_hand(), expected);
        }

        /// Replay safety: after any successful receipt, replaying the same
        /// order leaves every lot unchanged.
        #[test]
        fn prop_replay_never_changes_stock(raw_lines in lines_strategy()) {
            let mut warehouse = Warehouse::default();
            let order = Uuid::new_v4();
            let product = Uuid::new_v4();

            let lines: Vec<ReceiptLine> = raw_lines
                .into_iter()
                .map(|(quantity, expiry, batch)| line(
                    product,
                    quantity,
                    expiry.and_then(day),
                    batch.as_deref(),
                ))
                .collect();

            warehouse
                .receive(order, OrderStatus::InTransit, product, 1, lines.clone())
                .unwrap();
            let snapshot: HashMap<LotKey, i64> = warehouse.lots.clone();

            let replay = warehouse.receive(order, OrderStatus::InTransit, product, 1, lines);
            prop_assert_eq!(replay, Err(ReceiptError::ReceiptAlreadyExists));
            prop_assert_eq!(&warehouse.lots, &snapshot);
        }
    }
}
