//! Registry ("anagrafica") models: customers, suppliers and commercial
//! representatives

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment terms granted to or by a counterparty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    Immediate,
    Days15,
    Days30,
    Days60,
}

impl PaymentTerms {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerms::Immediate => "immediate",
            PaymentTerms::Days15 => "days_15",
            PaymentTerms::Days30 => "days_30",
            PaymentTerms::Days60 => "days_60",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(PaymentTerms::Immediate),
            "days_15" => Some(PaymentTerms::Days15),
            "days_30" => Some(PaymentTerms::Days30),
            "days_60" => Some(PaymentTerms::Days60),
            _ => None,
        }
    }
}

/// Supplier merchandise category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SupplierCategory {
    Food,
    Beverage,
    Packaging,
    Services,
    Other,
}

impl SupplierCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierCategory::Food => "food",
            SupplierCategory::Beverage => "beverage",
            SupplierCategory::Packaging => "packaging",
            SupplierCategory::Services => "services",
            SupplierCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "food" => Some(SupplierCategory::Food),
            "beverage" => Some(SupplierCategory::Beverage),
            "packaging" => Some(SupplierCategory::Packaging),
            "services" => Some(SupplierCategory::Services),
            "other" => Some(SupplierCategory::Other),
            _ => None,
        }
    }
}

/// A customer. Must carry at least one of VAT number / fiscal code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vat_number: Option<String>,
    pub fiscal_code: Option<String>,
    pub payment_terms: PaymentTerms,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A supplier. VAT number is mandatory; the IBAN is used for payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: String,
    pub email: String,
    pub vat_number: String,
    pub fiscal_code: Option<String>,
    pub iban: Option<String>,
    pub category: SupplierCategory,
    pub payment_terms: PaymentTerms,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A commercial representative tied to an employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Representative {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Commission percentage (0-100)
    pub commission_percent: Decimal,
    pub territory: Option<String>,
    pub vat_number: Option<String>,
    pub fiscal_code: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
