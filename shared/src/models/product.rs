//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a product is sold and counted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    Bottle,
    Kilogram,
    Liter,
    Package,
    Piece,
    Carton,
}

impl MeasurementUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Bottle => "bottle",
            MeasurementUnit::Kilogram => "kilogram",
            MeasurementUnit::Liter => "liter",
            MeasurementUnit::Package => "package",
            MeasurementUnit::Piece => "piece",
            MeasurementUnit::Carton => "carton",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bottle" => Some(MeasurementUnit::Bottle),
            "kilogram" => Some(MeasurementUnit::Kilogram),
            "liter" => Some(MeasurementUnit::Liter),
            "package" => Some(MeasurementUnit::Package),
            "piece" => Some(MeasurementUnit::Piece),
            "carton" => Some(MeasurementUnit::Carton),
            _ => None,
        }
    }
}

impl std::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// VAT rate brackets. Always one of the enumerated values, never an
/// arbitrary decimal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VatRate {
    Four,
    Ten,
    TwentyTwo,
}

impl VatRate {
    /// Rate as a fraction (0.04, 0.10, 0.22)
    pub fn as_fraction(&self) -> Decimal {
        match self {
            VatRate::Four => Decimal::new(4, 2),
            VatRate::Ten => Decimal::new(10, 2),
            VatRate::TwentyTwo => Decimal::new(22, 2),
        }
    }

    /// Rate as a whole percentage (4, 10, 22)
    pub fn as_percent(&self) -> Decimal {
        match self {
            VatRate::Four => Decimal::from(4),
            VatRate::Ten => Decimal::from(10),
            VatRate::TwentyTwo => Decimal::from(22),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VatRate::Four => "4",
            VatRate::Ten => "10",
            VatRate::TwentyTwo => "22",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "4" => Some(VatRate::Four),
            "10" => Some(VatRate::Ten),
            "22" => Some(VatRate::TwentyTwo),
            _ => None,
        }
    }
}

/// A purchasable product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// EAN-13 code, unique across the catalog
    pub ean: String,
    pub internal_code: Option<String>,
    pub unit: MeasurementUnit,
    pub vat_rate: VatRate,
    pub min_stock: i32,
    pub max_stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_rate_fractions() {
        assert_eq!(VatRate::Four.as_fraction(), Decimal::new(4, 2));
        assert_eq!(VatRate::TwentyTwo.as_fraction(), Decimal::new(22, 2));
    }

    #[test]
    fn test_vat_rate_round_trip() {
        for rate in [VatRate::Four, VatRate::Ten, VatRate::TwentyTwo] {
            assert_eq!(VatRate::from_str(rate.as_str()), Some(rate));
        }
        assert_eq!(VatRate::from_str("21"), None);
    }

    #[test]
    fn test_measurement_unit_round_trip() {
        for unit in [
            MeasurementUnit::Bottle,
            MeasurementUnit::Kilogram,
            MeasurementUnit::Liter,
            MeasurementUnit::Package,
            MeasurementUnit::Piece,
            MeasurementUnit::Carton,
        ] {
            assert_eq!(MeasurementUnit::from_str(unit.as_str()), Some(unit));
        }
    }
}
