//! Purchase order models: pricing, status lifecycle and numbering

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::product::{MeasurementUnit, VatRate};

/// Lifecycle state of a purchase order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Sent,
    Confirmed,
    InProduction,
    Shipped,
    InTransit,
    Received,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Sent => "sent",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Shipped => "shipped",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Received => "received",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(OrderStatus::Draft),
            "sent" => Some(OrderStatus::Sent),
            "confirmed" => Some(OrderStatus::Confirmed),
            "in_production" => Some(OrderStatus::InProduction),
            "shipped" => Some(OrderStatus::Shipped),
            "in_transit" => Some(OrderStatus::InTransit),
            "received" => Some(OrderStatus::Received),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Completed and Cancelled are absorbing states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// States from which a goods receipt may still be recorded.
    pub fn is_receivable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Sent
                | OrderStatus::Confirmed
                | OrderStatus::InProduction
                | OrderStatus::Shipped
                | OrderStatus::InTransit
        )
    }

    /// Pricing fields may only change while the order is a draft.
    pub fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Draft => Some(OrderStatus::Sent),
            OrderStatus::Sent => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::InProduction),
            OrderStatus::InProduction => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::InTransit),
            OrderStatus::InTransit => Some(OrderStatus::Received),
            OrderStatus::Received => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    /// Whether a user-facing status edit from `self` to `to` is allowed.
    ///
    /// The chain advances one state at a time; cancellation is allowed from
    /// every non-terminal state. `Received` is never a valid target here: it
    /// is entered only by receipt reconciliation.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        if to == OrderStatus::Received {
            return false;
        }
        self.next() == Some(to)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure modes of order status changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderStateError {
    #[error("cannot transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
    #[error("a sent date is required to mark the order as sent")]
    MissingRequiredDate,
}

/// Validate a user-requested status change.
///
/// Leaving draft requires the totals to be computed already; entering `Sent`
/// requires a sent date.
pub fn validate_status_change(
    from: OrderStatus,
    to: OrderStatus,
    date_sent: Option<NaiveDate>,
    totals_computed: bool,
) -> Result<(), OrderStateError> {
    if !from.can_transition_to(to) {
        return Err(OrderStateError::InvalidStatusTransition { from, to });
    }
    if from == OrderStatus::Draft && !totals_computed {
        return Err(OrderStateError::InvalidStatusTransition { from, to });
    }
    if to == OrderStatus::Sent && date_sent.is_none() {
        return Err(OrderStateError::MissingRequiredDate);
    }
    Ok(())
}

/// An order is late when its expected arrival is in the past and the goods
/// have not arrived (nor the order been closed or cancelled).
pub fn is_late(status: OrderStatus, expected_arrival: Option<NaiveDate>, today: NaiveDate) -> bool {
    match expected_arrival {
        Some(expected) => {
            expected < today
                && !matches!(
                    status,
                    OrderStatus::Received | OrderStatus::Completed | OrderStatus::Cancelled
                )
        }
        None => false,
    }
}

/// Order numbers are `ORD{year}{seq:04}`; the sequence restarts each
/// calendar year.
pub fn format_order_number(year: i32, sequence: i32) -> String {
    format!("ORD{}{:04}", year, sequence)
}

/// Failure modes of the pricing computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("unit price must be positive")]
    InvalidPrice,
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("discount must be between 0 and 100")]
    InvalidDiscount,
    #[error("units per package are required for package-based orders")]
    MissingPackagingMultiplier,
}

/// Inputs to the pricing computation for one order
#[derive(Debug, Clone)]
pub struct PricingInput {
    pub unit_price: Decimal,
    pub quantity: i32,
    /// Discount percentage (0-100)
    pub discount_percent: Decimal,
    pub unit: MeasurementUnit,
    /// Required (and > 0) only when `unit` is `Package`
    pub units_per_package: Option<Decimal>,
    pub vat_rate: VatRate,
}

/// Computed order totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub discounted_unit_price: Decimal,
    pub net_total: Decimal,
    pub total_with_vat: Decimal,
}

/// Monetary rounding used for stored totals (NUMERIC(12,2) columns).
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the discounted unit price and order totals.
///
/// The packaging multiplier collapses to 1 for non-package units, so a
/// single formula covers every measurement unit; a stray multiplier supplied
/// for a non-package unit is ignored. The VAT-inclusive total derives from
/// the rounded net total so the stored columns stay mutually consistent.
pub fn compute_order_totals(input: &PricingInput) -> Result<OrderTotals, PricingError> {
    if input.unit_price <= Decimal::ZERO {
        return Err(PricingError::InvalidPrice);
    }
    if input.quantity <= 0 {
        return Err(PricingError::InvalidQuantity);
    }
    if input.discount_percent < Decimal::ZERO || input.discount_percent > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDiscount);
    }

    let multiplier = match input.unit {
        MeasurementUnit::Package => match input.units_per_package {
            Some(m) if m > Decimal::ZERO => m,
            _ => return Err(PricingError::MissingPackagingMultiplier),
        },
        _ => Decimal::ONE,
    };

    let discounted_unit_price =
        input.unit_price * (Decimal::ONE - input.discount_percent / Decimal::ONE_HUNDRED);
    let net_total = round_money(discounted_unit_price * multiplier * Decimal::from(input.quantity));
    let total_with_vat = round_money(net_total * (Decimal::ONE + input.vat_rate.as_fraction()));

    Ok(OrderTotals {
        discounted_unit_price,
        net_total,
        total_with_vat,
    })
}

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Assigned once at creation, immutable and unique
    pub order_number: String,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub unit: MeasurementUnit,
    pub units_per_package: Option<Decimal>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub net_total: Decimal,
    pub total_with_vat: Decimal,
    pub status: OrderStatus,
    pub date_sent: Option<NaiveDate>,
    pub expected_arrival: Option<NaiveDate>,
    pub date_received: Option<NaiveDate>,
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_late(&self, today: NaiveDate) -> bool {
        is_late(self.status, self.expected_arrival, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pricing(unit: MeasurementUnit, per_package: Option<&str>) -> PricingInput {
        PricingInput {
            unit_price: dec("10.00"),
            quantity: 5,
            discount_percent: dec("10"),
            unit,
            units_per_package: per_package.map(dec),
            vat_rate: VatRate::TwentyTwo,
        }
    }

    #[test]
    fn test_compute_totals_reference_scenario() {
        // 10.00 at 10% discount, 5 pieces, 22% VAT
        let totals = compute_order_totals(&pricing(MeasurementUnit::Piece, None)).unwrap();
        assert_eq!(totals.discounted_unit_price, dec("9.00"));
        assert_eq!(totals.net_total, dec("45.00"));
        assert_eq!(totals.total_with_vat, dec("54.90"));
    }

    #[test]
    fn test_compute_totals_package_multiplier() {
        let totals = compute_order_totals(&pricing(MeasurementUnit::Package, Some("6"))).unwrap();
        assert_eq!(totals.net_total, dec("270.00"));
        assert_eq!(totals.total_with_vat, dec("329.40"));
    }

    #[test]
    fn test_stray_multiplier_ignored_for_non_package_units() {
        let plain = compute_order_totals(&pricing(MeasurementUnit::Bottle, None)).unwrap();
        let stray = compute_order_totals(&pricing(MeasurementUnit::Bottle, Some("12"))).unwrap();
        assert_eq!(plain.net_total, stray.net_total);
        assert_eq!(plain.total_with_vat, stray.total_with_vat);
    }

    #[test]
    fn test_missing_packaging_multiplier() {
        assert_eq!(
            compute_order_totals(&pricing(MeasurementUnit::Package, None)),
            Err(PricingError::MissingPackagingMultiplier)
        );
        assert_eq!(
            compute_order_totals(&pricing(MeasurementUnit::Package, Some("0"))),
            Err(PricingError::MissingPackagingMultiplier)
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = pricing(MeasurementUnit::Piece, None);
        input.unit_price = Decimal::ZERO;
        assert_eq!(
            compute_order_totals(&input),
            Err(PricingError::InvalidPrice)
        );

        let mut input = pricing(MeasurementUnit::Piece, None);
        input.quantity = 0;
        assert_eq!(
            compute_order_totals(&input),
            Err(PricingError::InvalidQuantity)
        );

        let mut input = pricing(MeasurementUnit::Piece, None);
        input.discount_percent = dec("101");
        assert_eq!(
            compute_order_totals(&input),
            Err(PricingError::InvalidDiscount)
        );
    }

    #[test]
    fn test_status_chain_moves_one_step() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Sent));
        assert!(OrderStatus::Sent.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::InTransit.can_transition_to(OrderStatus::Cancelled));
        // No skipping
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Shipped));
        // No going back
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_received_never_a_direct_target() {
        assert!(!OrderStatus::InTransit.can_transition_to(OrderStatus::Received));
        assert!(OrderStatus::InTransit.is_receivable());
        assert!(!OrderStatus::Draft.is_receivable());
        assert!(!OrderStatus::Completed.is_receivable());
    }

    #[test]
    fn test_cancelled_is_absorbing() {
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Sent));
    }

    #[test]
    fn test_sent_requires_date() {
        assert_eq!(
            validate_status_change(OrderStatus::Draft, OrderStatus::Sent, None, true),
            Err(OrderStateError::MissingRequiredDate)
        );
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(
            validate_status_change(OrderStatus::Draft, OrderStatus::Sent, Some(date), true).is_ok()
        );
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(format_order_number(2025, 1), "ORD20250001");
        assert_eq!(format_order_number(2025, 123), "ORD20250123");
        assert_eq!(format_order_number(2026, 1), "ORD20260001");
    }

    #[test]
    fn test_is_late() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        assert!(is_late(OrderStatus::Sent, Some(yesterday), today));
        assert!(!is_late(OrderStatus::Received, Some(yesterday), today));
        assert!(!is_late(OrderStatus::Cancelled, Some(yesterday), today));
        assert!(!is_late(OrderStatus::Sent, Some(today), today));
        assert!(!is_late(OrderStatus::Sent, None, today));
    }
}
