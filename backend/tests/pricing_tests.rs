//! Order pricing tests
//!
//! Covers the discount/packaging/VAT formula, the idempotent recomputation
//! law and the packaging multiplier boundary.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{compute_order_totals, MeasurementUnit, PricingError, PricingInput, VatRate};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn input(
    unit_price: &str,
    quantity: i32,
    discount: &str,
    unit: MeasurementUnit,
    per_package: Option<&str>,
    vat_rate: VatRate,
) -> PricingInput {
    PricingInput {
        unit_price: dec(unit_price),
        quantity,
        discount_percent: dec(discount),
        unit,
        units_per_package: per_package.map(dec),
        vat_rate,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Reference scenario: 22% VAT, 10.00 unit price, 5 pieces, 10% discount
    /// => 9.00 / 45.00 / 54.90
    #[test]
    fn test_reference_scenario() {
        let totals = compute_order_totals(&input(
            "10.00",
            5,
            "10",
            MeasurementUnit::Piece,
            None,
            VatRate::TwentyTwo,
        ))
        .unwrap();

        assert_eq!(totals.discounted_unit_price, dec("9.00"));
        assert_eq!(totals.net_total, dec("45.00"));
        assert_eq!(totals.total_with_vat, dec("54.90"));
    }

    #[test]
    fn test_no_discount() {
        let totals = compute_order_totals(&input(
            "2.50",
            4,
            "0",
            MeasurementUnit::Bottle,
            None,
            VatRate::Four,
        ))
        .unwrap();

        assert_eq!(totals.net_total, dec("10.00"));
        assert_eq!(totals.total_with_vat, dec("10.40"));
    }

    #[test]
    fn test_package_multiplier_scales_net_total() {
        let totals = compute_order_totals(&input(
            "1.20",
            10,
            "0",
            MeasurementUnit::Package,
            Some("6"),
            VatRate::Ten,
        ))
        .unwrap();

        // 1.20 * 6 * 10 = 72.00, + 10% VAT = 79.20
        assert_eq!(totals.net_total, dec("72.00"));
        assert_eq!(totals.total_with_vat, dec("79.20"));
    }

    /// Boundary: a stray multiplier must not change totals for non-package
    /// units.
    #[test]
    fn test_stray_multiplier_is_inert() {
        for unit in [
            MeasurementUnit::Bottle,
            MeasurementUnit::Kilogram,
            MeasurementUnit::Liter,
            MeasurementUnit::Piece,
            MeasurementUnit::Carton,
        ] {
            let plain =
                compute_order_totals(&input("3.30", 7, "5", unit, None, VatRate::TwentyTwo))
                    .unwrap();
            let stray =
                compute_order_totals(&input("3.30", 7, "5", unit, Some("24"), VatRate::TwentyTwo))
                    .unwrap();
            assert_eq!(plain, stray);
        }
    }

    #[test]
    fn test_missing_multiplier_for_package_unit() {
        assert_eq!(
            compute_order_totals(&input(
                "3.30",
                7,
                "5",
                MeasurementUnit::Package,
                None,
                VatRate::TwentyTwo,
            )),
            Err(PricingError::MissingPackagingMultiplier)
        );
    }

    #[test]
    fn test_input_domain_errors() {
        assert_eq!(
            compute_order_totals(&input(
                "0",
                1,
                "0",
                MeasurementUnit::Piece,
                None,
                VatRate::Four
            )),
            Err(PricingError::InvalidPrice)
        );
        assert_eq!(
            compute_order_totals(&input(
                "1.00",
                0,
                "0",
                MeasurementUnit::Piece,
                None,
                VatRate::Four
            )),
            Err(PricingError::InvalidQuantity)
        );
        assert_eq!(
            compute_order_totals(&input(
                "1.00",
                1,
                "100.01",
                MeasurementUnit::Piece,
                None,
                VatRate::Four
            )),
            Err(PricingError::InvalidDiscount)
        );
    }

    #[test]
    fn test_full_discount_zeroes_totals() {
        let totals = compute_order_totals(&input(
            "8.00",
            3,
            "100",
            MeasurementUnit::Piece,
            None,
            VatRate::TwentyTwo,
        ))
        .unwrap();

        assert_eq!(totals.net_total, Decimal::ZERO);
        assert_eq!(totals.total_with_vat, Decimal::ZERO);
    }

    #[test]
    fn test_rounding_to_cent() {
        // 0.33 * 3 at 22% VAT: 0.99 net, 1.2078 gross -> 1.21
        let totals = compute_order_totals(&input(
            "0.33",
            3,
            "0",
            MeasurementUnit::Piece,
            None,
            VatRate::TwentyTwo,
        ))
        .unwrap();

        assert_eq!(totals.net_total, dec("0.99"));
        assert_eq!(totals.total_with_vat, dec("1.21"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating valid discounts (0 to 100, two decimals)
    fn discount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn vat_strategy() -> impl Strategy<Value = VatRate> {
        prop_oneof![
            Just(VatRate::Four),
            Just(VatRate::Ten),
            Just(VatRate::TwentyTwo),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Idempotent recomputation law: computing twice from the same
        /// inputs always yields the same stored totals.
        #[test]
        fn prop_recomputation_is_idempotent(
            unit_price in price_strategy(),
            quantity in 1i32..=1000,
            discount in discount_strategy(),
            vat_rate in vat_strategy()
        ) {
            let pricing = PricingInput {
                unit_price,
                quantity,
                discount_percent: discount,
                unit: MeasurementUnit::Piece,
                units_per_package: None,
                vat_rate,
            };
            let first = compute_order_totals(&pricing).unwrap();
            let second = compute_order_totals(&pricing).unwrap();
            prop_assert_eq!(first, second);
        }

        /// The VAT-inclusive total never falls below the net total, and the
        /// net total never exceeds the undiscounted gross amount.
        #[test]
        fn prop_total_ordering(
            unit_price in price_strategy(),
            quantity in 1i32..=1000,
            discount in discount_strategy(),
            vat_rate in vat_strategy()
        ) {
            let totals = compute_order_totals(&PricingInput {
                unit_price,
                quantity,
                discount_percent: discount,
                unit: MeasurementUnit::Piece,
                units_per_package: None,
                vat_rate,
            })
            .unwrap();

            prop_assert!(totals.total_with_vat >= totals.net_total);
            prop_assert!(totals.net_total <= unit_price * Decimal::from(quantity));
            prop_assert!(totals.net_total >= Decimal::ZERO);
        }

        /// With no discount the net total is exactly price x quantity.
        #[test]
        fn prop_undiscounted_net_total(
            unit_price in price_strategy(),
            quantity in 1i32..=1000
        ) {
            let totals = compute_order_totals(&PricingInput {
                unit_price,
                quantity,
                discount_percent: Decimal::ZERO,
                unit: MeasurementUnit::Piece,
                units_per_package: None,
                vat_rate: VatRate::TwentyTwo,
            })
            .unwrap();

            prop_assert_eq!(totals.net_total, unit_price * Decimal::from(quantity));
        }

        /// A package order with multiplier 1 prices exactly like the same
        /// order sold by the piece.
        #[test]
        fn prop_multiplier_one_matches_piece(
            unit_price in price_strategy(),
            quantity in 1i32..=1000,
            discount in discount_strategy()
        ) {
            let by_piece = compute_order_totals(&PricingInput {
                unit_price,
                quantity,
                discount_percent: discount,
                unit: MeasurementUnit::Piece,
                units_per_package: None,
                vat_rate: VatRate::Ten,
            })
            .unwrap();
            let by_package = compute_order_totals(&PricingInput {
                unit_price,
                quantity,
                discount_percent: discount,
                unit: MeasurementUnit::Package,
                units_per_package: Some(Decimal::ONE),
                vat_rate: VatRate::Ten,
            })
            .unwrap();

            prop_assert_eq!(by_piece, by_package);
        }
    }
}
