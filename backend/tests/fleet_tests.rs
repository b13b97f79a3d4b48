//! Fleet statistics tests
//!
//! Covers the consumption aggregation law, leg exclusion, odometer
//! monotonicity and the trailing-year maintenance window.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    compute_fleet_statistics, consumption_per_100km, leg_consumptions,
    validate_odometer_progression, FleetError, MaintenanceSample, RefuelSample,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn refuel(date: NaiveDate, odometer_km: i64, liters: &str, cost: &str) -> RefuelSample {
    RefuelSample {
        date,
        odometer_km,
        liters: dec(liters),
        total_cost: dec(cost),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Aggregation law fixture: 30 L + 25 L over 950 km
    /// => (55 / 950) x 100 ~= 5.789 L/100km
    #[test]
    fn test_consumption_aggregation_law_fixture() {
        let refuels = [
            refuel(day(2025, 5, 1), 120_400, "30", "55.50"),
            refuel(day(2025, 5, 18), 120_950, "25", "46.25"),
        ];
        let stats = compute_fleet_statistics(120_000, &refuels, &[], day(2025, 6, 1));

        assert_eq!(stats.total_km, 950);
        let average = stats.average_consumption.unwrap();
        assert_eq!(average, dec("55") / dec("950") * Decimal::ONE_HUNDRED);
        assert!(average > dec("5.78") && average < dec("5.79"));
    }

    #[test]
    fn test_cost_per_km() {
        let refuels = [
            refuel(day(2025, 5, 1), 10_500, "30", "60.00"),
            refuel(day(2025, 5, 20), 11_000, "25", "40.00"),
        ];
        let stats = compute_fleet_statistics(10_000, &refuels, &[], day(2025, 6, 1));

        assert_eq!(stats.fuel_cost_per_km, Some(dec("100.00") / dec("1000")));
    }

    /// Without a positive distance the statistics are absent, not zero.
    #[test]
    fn test_undefined_statistics() {
        let stats = compute_fleet_statistics(50_000, &[], &[], day(2025, 1, 1));
        assert_eq!(stats.average_consumption, None);
        assert_eq!(stats.fuel_cost_per_km, None);

        let refuels = [refuel(day(2025, 1, 1), 50_000, "20", "36.00")];
        let stats = compute_fleet_statistics(50_000, &refuels, &[], day(2025, 1, 2));
        assert_eq!(stats.average_consumption, None);
        assert_eq!(stats.fuel_cost_per_km, None);
    }

    /// Zero-distance legs are excluded from the per-event series rather
    /// than reported as zero consumption.
    #[test]
    fn test_leg_exclusion() {
        let refuels = [
            refuel(day(2025, 3, 1), 20_200, "16", "28.80"),
            refuel(day(2025, 3, 2), 20_200, "10", "18.00"),
            refuel(day(2025, 3, 9), 20_600, "24", "43.20"),
        ];
        let legs = leg_consumptions(20_000, &refuels);

        assert_eq!(legs[0], Some(dec("8")));
        assert_eq!(legs[1], None);
        assert_eq!(legs[2], Some(dec("6")));
    }

    #[test]
    fn test_consumption_per_100km_guard() {
        assert_eq!(consumption_per_100km(dec("10"), 0), None);
        assert_eq!(consumption_per_100km(dec("10"), -5), None);
        assert_eq!(consumption_per_100km(dec("10"), 200), Some(dec("5")));
    }

    #[test]
    fn test_odometer_monotonicity_enforced() {
        assert!(validate_odometer_progression(10_000, 10_000).is_ok());
        assert!(validate_odometer_progression(10_000, 10_001).is_ok());
        assert_eq!(
            validate_odometer_progression(10_000, 9_000),
            Err(FleetError::OdometerRegression)
        );
    }

    /// Only completed maintenance with an actual date inside the trailing
    /// 365 days contributes to the yearly cost.
    #[test]
    fn test_yearly_maintenance_window() {
        let today = day(2025, 7, 1);
        let maintenance = [
            MaintenanceSample {
                actual_date: Some(day(2025, 3, 15)),
                actual_cost: Some(dec("150.00")),
                is_completed: true,
            },
            MaintenanceSample {
                actual_date: Some(day(2024, 7, 2)),
                actual_cost: Some(dec("80.00")),
                is_completed: true,
            },
            // A year and a day ago: outside the window
            MaintenanceSample {
                actual_date: Some(day(2024, 6, 30)),
                actual_cost: Some(dec("999.00")),
                is_completed: true,
            },
            // Planned but not completed
            MaintenanceSample {
                actual_date: Some(day(2025, 6, 1)),
                actual_cost: Some(dec("70.00")),
                is_completed: false,
            },
        ];

        let stats = compute_fleet_statistics(0, &[], &maintenance, today);
        assert_eq!(stats.yearly_maintenance_cost, dec("230.00"));
        assert_eq!(stats.last_maintenance_date, Some(day(2025, 3, 15)));
    }

    #[test]
    fn test_last_event_dates() {
        let refuels = [
            refuel(day(2025, 2, 1), 10_100, "10", "18.00"),
            refuel(day(2025, 2, 20), 10_400, "12", "21.60"),
        ];
        let stats = compute_fleet_statistics(10_000, &refuels, &[], day(2025, 3, 1));
        assert_eq!(stats.last_refuel_date, Some(day(2025, 2, 20)));
        assert_eq!(stats.last_maintenance_date, None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a monotone refuel history starting at 100_000 km
    fn history_strategy() -> impl Strategy<Value = Vec<RefuelSample>> {
        prop::collection::vec((1i64..=800, 1i64..=600, 1i64..=1_000), 1..12).prop_map(|steps| {
            let mut odometer = 100_000i64;
            let mut date = day(2025, 1, 1);
            steps
                .into_iter()
                .map(|(km, deciliters, cost_cents)| {
                    odometer += km;
                    date += chrono::Duration::days(3);
                    RefuelSample {
                        date,
                        odometer_km: odometer,
                        liters: Decimal::new(deciliters, 1),
                        total_cost: Decimal::new(cost_cents, 2),
                    }
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Aggregation law: the overall average equals total liters over
        /// total distance, independent of how many intermediate refuels
        /// occurred.
        #[test]
        fn prop_average_independent_of_intermediate_events(history in history_strategy()) {
            let stats = compute_fleet_statistics(100_000, &history, &[], day(2026, 1, 1));

            let total_liters: Decimal = history.iter().map(|r| r.liters).sum();
            let total_km = history.last().unwrap().odometer_km - 100_000;
            prop_assert_eq!(
                stats.average_consumption,
                Some(total_liters / Decimal::from(total_km) * Decimal::ONE_HUNDRED)
            );

            // Collapsing the history into one equivalent refuel yields the
            // same average
            let collapsed = [RefuelSample {
                date: history.last().unwrap().date,
                odometer_km: history.last().unwrap().odometer_km,
                liters: total_liters,
                total_cost: history.iter().map(|r| r.total_cost).sum(),
            }];
            let collapsed_stats =
                compute_fleet_statistics(100_000, &collapsed, &[], day(2026, 1, 1));
            prop_assert_eq!(stats.average_consumption, collapsed_stats.average_consumption);
            prop_assert_eq!(stats.fuel_cost_per_km, collapsed_stats.fuel_cost_per_km);
        }

        /// Recomputation is idempotent and never mutates its inputs.
        #[test]
        fn prop_recomputation_idempotent(history in history_strategy()) {
            let before = history.clone();
            let first = compute_fleet_statistics(100_000, &history, &[], day(2026, 1, 1));
            let second = compute_fleet_statistics(100_000, &history, &[], day(2026, 1, 1));
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(history.len(), before.len());
        }

        /// Monotone histories always pass the odometer progression check
        /// leg by leg.
        #[test]
        fn prop_monotone_history_accepted(history in history_strategy()) {
            let mut previous = 100_000i64;
            for sample in &history {
                prop_assert!(validate_odometer_progression(previous, sample.odometer_km).is_ok());
                previous = sample.odometer_km;
            }
        }
    }
}
