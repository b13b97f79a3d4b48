//! Fleet models and derived vehicle statistics

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fuel type with a reference cost per liter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelType {
    pub id: Uuid,
    pub name: String,
    pub cost_per_liter: Decimal,
}

/// A company vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub registration_year: i32,
    pub chassis_number: Option<String>,
    pub fuel_type_id: Option<Uuid>,
    /// Odometer reading when the vehicle entered the fleet
    pub starting_odometer_km: i64,
    /// Highest odometer reading recorded so far
    pub current_odometer_km: i64,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub assigned_to: Option<Uuid>,
    pub is_active: bool,
    pub is_available: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn total_km(&self) -> i64 {
        self.current_odometer_km - self.starting_odometer_km
    }
}

/// A refueling event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefuelingEvent {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub refuel_date: NaiveDate,
    pub odometer_km: i64,
    pub liters: Decimal,
    pub total_cost: Decimal,
    pub cost_per_liter: Option<Decimal>,
    pub station: Option<String>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Maintenance categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Routine,
    Extraordinary,
    Service,
    Repair,
    Tires,
    Other,
}

impl MaintenanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Routine => "routine",
            MaintenanceKind::Extraordinary => "extraordinary",
            MaintenanceKind::Service => "service",
            MaintenanceKind::Repair => "repair",
            MaintenanceKind::Tires => "tires",
            MaintenanceKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "routine" => Some(MaintenanceKind::Routine),
            "extraordinary" => Some(MaintenanceKind::Extraordinary),
            "service" => Some(MaintenanceKind::Service),
            "repair" => Some(MaintenanceKind::Repair),
            "tires" => Some(MaintenanceKind::Tires),
            "other" => Some(MaintenanceKind::Other),
            _ => None,
        }
    }
}

/// A maintenance event. Completing without an actual date defaults it to
/// the completion day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: MaintenanceKind,
    pub description: String,
    pub planned_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub odometer_km: Option<i64>,
    pub planned_cost: Decimal,
    pub actual_cost: Option<Decimal>,
    pub is_completed: bool,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehicle document categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleDocumentKind {
    Insurance,
    Inspection,
    RoadTax,
    Registration,
    Other,
}

impl VehicleDocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleDocumentKind::Insurance => "insurance",
            VehicleDocumentKind::Inspection => "inspection",
            VehicleDocumentKind::RoadTax => "road_tax",
            VehicleDocumentKind::Registration => "registration",
            VehicleDocumentKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "insurance" => Some(VehicleDocumentKind::Insurance),
            "inspection" => Some(VehicleDocumentKind::Inspection),
            "road_tax" => Some(VehicleDocumentKind::RoadTax),
            "registration" => Some(VehicleDocumentKind::Registration),
            "other" => Some(VehicleDocumentKind::Other),
            _ => None,
        }
    }
}

/// A vehicle document with an expiry to track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDocument {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: VehicleDocumentKind,
    pub document_number: Option<String>,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub cost: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleDocument {
    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    pub fn is_expiring_within(&self, today: NaiveDate, days: i64) -> bool {
        (0..=days).contains(&self.days_to_expiry(today))
    }
}

/// Failure modes of fleet event recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("odometer reading is lower than the previous recorded reading")]
    OdometerRegression,
}

/// Odometer readings must be non-decreasing across a vehicle's history.
pub fn validate_odometer_progression(previous_km: i64, new_km: i64) -> Result<(), FleetError> {
    if new_km < previous_km {
        Err(FleetError::OdometerRegression)
    } else {
        Ok(())
    }
}

/// Cost per liter derived from a refuel when not supplied explicitly.
pub fn derive_cost_per_liter(total_cost: Decimal, liters: Decimal) -> Option<Decimal> {
    if liters > Decimal::ZERO {
        Some(total_cost / liters)
    } else {
        None
    }
}

/// One refuel of a vehicle's chronological history, as consumed by the
/// statistics functions.
#[derive(Debug, Clone, Copy)]
pub struct RefuelSample {
    pub date: NaiveDate,
    pub odometer_km: i64,
    pub liters: Decimal,
    pub total_cost: Decimal,
}

/// One maintenance record as consumed by the statistics functions.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceSample {
    pub actual_date: Option<NaiveDate>,
    pub actual_cost: Option<Decimal>,
    pub is_completed: bool,
}

/// Consumption over a single leg, `None` when no distance was covered.
pub fn consumption_per_100km(liters: Decimal, km: i64) -> Option<Decimal> {
    if km > 0 {
        Some(liters / Decimal::from(km) * Decimal::ONE_HUNDRED)
    } else {
        None
    }
}

/// Per-event consumption series. Each leg runs from the previous refuel's
/// odometer (or the starting odometer for the first event); legs without a
/// positive distance yield `None` and are excluded from averages rather than
/// counted as zero.
pub fn leg_consumptions(
    starting_odometer_km: i64,
    refuels: &[RefuelSample],
) -> Vec<Option<Decimal>> {
    let mut previous = starting_odometer_km;
    refuels
        .iter()
        .map(|refuel| {
            let km = refuel.odometer_km - previous;
            previous = refuel.odometer_km;
            consumption_per_100km(refuel.liters, km)
        })
        .collect()
}

/// Derived per-vehicle statistics: a cache recomputed on demand from the
/// event streams, never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetStatistics {
    /// Liters per 100 km over the whole refuel history
    pub average_consumption: Option<Decimal>,
    /// Fuel spend per km travelled
    pub fuel_cost_per_km: Option<Decimal>,
    /// Completed maintenance cost over the trailing 365 days
    pub yearly_maintenance_cost: Decimal,
    pub total_km: i64,
    pub last_refuel_date: Option<NaiveDate>,
    pub last_maintenance_date: Option<NaiveDate>,
}

/// Recompute the statistics snapshot for one vehicle.
///
/// `refuels` must be in chronological order. Total distance is measured from
/// the starting odometer to the last refuel's reading; both averages are
/// undefined (`None`) without a positive distance. Pure: never mutates the
/// event history, safe to re-run at any time.
pub fn compute_fleet_statistics(
    starting_odometer_km: i64,
    refuels: &[RefuelSample],
    maintenance: &[MaintenanceSample],
    today: NaiveDate,
) -> FleetStatistics {
    let total_km = refuels
        .last()
        .map(|last| last.odometer_km - starting_odometer_km)
        .unwrap_or(0);

    let total_liters: Decimal = refuels.iter().map(|r| r.liters).sum();
    let total_fuel_cost: Decimal = refuels.iter().map(|r| r.total_cost).sum();

    let (average_consumption, fuel_cost_per_km) = if total_km > 0 {
        let km = Decimal::from(total_km);
        (
            Some(total_liters / km * Decimal::ONE_HUNDRED),
            Some(total_fuel_cost / km),
        )
    } else {
        (None, None)
    };

    let window_start = today - Duration::days(365);
    let yearly_maintenance_cost = maintenance
        .iter()
        .filter(|m| m.is_completed)
        .filter_map(|m| m.actual_date.map(|date| (date, m.actual_cost)))
        .filter(|(date, _)| *date >= window_start && *date <= today)
        .map(|(_, cost)| cost.unwrap_or(Decimal::ZERO))
        .sum();

    let last_maintenance_date = maintenance
        .iter()
        .filter(|m| m.is_completed)
        .filter_map(|m| m.actual_date)
        .max();

    FleetStatistics {
        average_consumption,
        fuel_cost_per_km,
        yearly_maintenance_cost,
        total_km,
        last_refuel_date: refuels.last().map(|r| r.date),
        last_maintenance_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn refuel(d: u32, odometer: i64, liters: &str, cost: &str) -> RefuelSample {
        RefuelSample {
            date: day(d),
            odometer_km: odometer,
            liters: dec(liters),
            total_cost: dec(cost),
        }
    }

    #[test]
    fn test_average_consumption_matches_aggregation_law() {
        // 30 L + 25 L over 950 km total => (55 / 950) * 100
        let refuels = [
            refuel(1, 10_500, "30", "54.00"),
            refuel(10, 10_950, "25", "45.00"),
        ];
        let stats = compute_fleet_statistics(10_000, &refuels, &[], day(20));
        assert_eq!(stats.total_km, 950);
        assert_eq!(
            stats.average_consumption,
            Some(dec("55") / dec("950") * Decimal::ONE_HUNDRED)
        );
        assert_eq!(stats.fuel_cost_per_km, Some(dec("99.00") / dec("950")));
    }

    #[test]
    fn test_statistics_undefined_without_distance() {
        let stats = compute_fleet_statistics(10_000, &[], &[], day(1));
        assert_eq!(stats.average_consumption, None);
        assert_eq!(stats.fuel_cost_per_km, None);
        assert_eq!(stats.total_km, 0);

        // A single refuel at the starting odometer covers no distance
        let refuels = [refuel(1, 10_000, "30", "54.00")];
        let stats = compute_fleet_statistics(10_000, &refuels, &[], day(2));
        assert_eq!(stats.average_consumption, None);
    }

    #[test]
    fn test_leg_without_distance_is_excluded_not_zero() {
        let refuels = [
            refuel(1, 10_100, "10", "18.00"),
            refuel(2, 10_100, "5", "9.00"),
            refuel(3, 10_300, "15", "27.00"),
        ];
        let legs = leg_consumptions(10_000, &refuels);
        assert_eq!(legs[0], Some(dec("10")));
        assert_eq!(legs[1], None);
        assert_eq!(legs[2], Some(dec("7.5")));
    }

    #[test]
    fn test_yearly_maintenance_cost_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let maintenance = [
            MaintenanceSample {
                actual_date: NaiveDate::from_ymd_opt(2025, 1, 10),
                actual_cost: Some(dec("200.00")),
                is_completed: true,
            },
            // Outside the trailing year
            MaintenanceSample {
                actual_date: NaiveDate::from_ymd_opt(2023, 12, 1),
                actual_cost: Some(dec("500.00")),
                is_completed: true,
            },
            // Not completed: excluded
            MaintenanceSample {
                actual_date: NaiveDate::from_ymd_opt(2025, 5, 1),
                actual_cost: Some(dec("90.00")),
                is_completed: false,
            },
            // Completed but costless
            MaintenanceSample {
                actual_date: NaiveDate::from_ymd_opt(2025, 5, 20),
                actual_cost: None,
                is_completed: true,
            },
        ];
        let stats = compute_fleet_statistics(0, &[], &maintenance, today);
        assert_eq!(stats.yearly_maintenance_cost, dec("200.00"));
        assert_eq!(
            stats.last_maintenance_date,
            NaiveDate::from_ymd_opt(2025, 5, 20)
        );
    }

    #[test]
    fn test_odometer_progression() {
        assert!(validate_odometer_progression(10_000, 10_000).is_ok());
        assert!(validate_odometer_progression(10_000, 10_500).is_ok());
        assert_eq!(
            validate_odometer_progression(10_000, 9_999),
            Err(FleetError::OdometerRegression)
        );
    }

    #[test]
    fn test_derive_cost_per_liter() {
        assert_eq!(
            derive_cost_per_liter(dec("90.00"), dec("50")),
            Some(dec("1.8"))
        );
        assert_eq!(derive_cost_per_liter(dec("90.00"), Decimal::ZERO), None);
    }
}
