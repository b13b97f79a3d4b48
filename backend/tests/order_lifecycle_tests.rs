//! Order lifecycle tests
//!
//! Covers the status machine, the sent-date requirement, lateness and the
//! order number format.

use chrono::NaiveDate;
use proptest::prelude::*;
use shared::{
    format_order_number, is_late, validate_status_change, OrderStateError, OrderStatus,
};

const ALL_STATUSES: [OrderStatus; 9] = [
    OrderStatus::Draft,
    OrderStatus::Sent,
    OrderStatus::Confirmed,
    OrderStatus::InProduction,
    OrderStatus::Shipped,
    OrderStatus::InTransit,
    OrderStatus::Received,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_forward_chain() {
        let chain = [
            OrderStatus::Draft,
            OrderStatus::Sent,
            OrderStatus::Confirmed,
            OrderStatus::InProduction,
            OrderStatus::Shipped,
            OrderStatus::InTransit,
        ];
        for pair in chain.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        // Closing the lifecycle after the goods arrived
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Sent.can_transition_to(OrderStatus::InTransit));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Sent));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Draft));
    }

    #[test]
    fn test_cancellation_reachability() {
        for status in ALL_STATUSES {
            let expected = !matches!(status, OrderStatus::Completed | OrderStatus::Cancelled);
            assert_eq!(
                status.can_transition_to(OrderStatus::Cancelled),
                expected,
                "cancel from {}",
                status
            );
        }
    }

    /// Received is only ever entered by receipt reconciliation.
    #[test]
    fn test_received_unreachable_by_status_edit() {
        for status in ALL_STATUSES {
            assert!(!status.can_transition_to(OrderStatus::Received));
        }
    }

    #[test]
    fn test_receivable_set() {
        let receivable = [
            OrderStatus::Sent,
            OrderStatus::Confirmed,
            OrderStatus::InProduction,
            OrderStatus::Shipped,
            OrderStatus::InTransit,
        ];
        for status in ALL_STATUSES {
            assert_eq!(status.is_receivable(), receivable.contains(&status));
        }
    }

    #[test]
    fn test_sent_requires_date() {
        assert_eq!(
            validate_status_change(OrderStatus::Draft, OrderStatus::Sent, None, true),
            Err(OrderStateError::MissingRequiredDate)
        );
        assert!(validate_status_change(
            OrderStatus::Draft,
            OrderStatus::Sent,
            Some(day(2025, 3, 1)),
            true
        )
        .is_ok());
    }

    #[test]
    fn test_leaving_draft_requires_totals() {
        assert_eq!(
            validate_status_change(
                OrderStatus::Draft,
                OrderStatus::Sent,
                Some(day(2025, 3, 1)),
                false
            ),
            Err(OrderStateError::InvalidStatusTransition {
                from: OrderStatus::Draft,
                to: OrderStatus::Sent
            })
        );
    }

    #[test]
    fn test_late_determination() {
        let today = day(2025, 6, 15);
        let past = day(2025, 6, 1);

        assert!(is_late(OrderStatus::Sent, Some(past), today));
        assert!(is_late(OrderStatus::Draft, Some(past), today));
        assert!(is_late(OrderStatus::InTransit, Some(past), today));
        // Closed or cancelled orders are never late
        assert!(!is_late(OrderStatus::Received, Some(past), today));
        assert!(!is_late(OrderStatus::Completed, Some(past), today));
        assert!(!is_late(OrderStatus::Cancelled, Some(past), today));
        // Due today is not late yet
        assert!(!is_late(OrderStatus::Sent, Some(today), today));
        assert!(!is_late(OrderStatus::Sent, None, today));
    }

    #[test]
    fn test_order_number_format_and_rollover() {
        assert_eq!(format_order_number(2025, 1), "ORD20250001");
        assert_eq!(format_order_number(2025, 42), "ORD20250042");
        assert_eq!(format_order_number(2025, 10_000), "ORD202510000");
        // The sequence restarts with the calendar year
        assert_eq!(format_order_number(2026, 1), "ORD20260001");
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("unknown"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop::sample::select(ALL_STATUSES.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every allowed user-facing transition is either a single forward
        /// step or a cancellation; nothing else ever passes.
        #[test]
        fn prop_transitions_are_step_or_cancel(
            from in status_strategy(),
            to in status_strategy()
        ) {
            if from.can_transition_to(to) {
                let is_cancel = to == OrderStatus::Cancelled;
                let position = |s: OrderStatus| ALL_STATUSES.iter().position(|x| *x == s).unwrap();
                let is_step = !is_cancel
                    && to != OrderStatus::Received
                    && position(to) == position(from) + 1;
                prop_assert!(is_cancel || is_step);
            }
        }

        /// Terminal states allow no transition at all.
        #[test]
        fn prop_terminal_states_absorb(to in status_strategy()) {
            prop_assert!(!OrderStatus::Completed.can_transition_to(to));
            prop_assert!(!OrderStatus::Cancelled.can_transition_to(to));
        }

        /// A rejected machine transition is rejected regardless of dates and
        /// totals.
        #[test]
        fn prop_machine_rejection_is_final(
            from in status_strategy(),
            to in status_strategy(),
            with_date in any::<bool>()
        ) {
            prop_assume!(!from.can_transition_to(to));
            let date = with_date.then(|| day(2025, 1, 1));
            prop_assert_eq!(
                validate_status_change(from, to, date, true),
                Err(OrderStateError::InvalidStatusTransition { from, to })
            );
        }
    }
}
