//! Registry service for customers, suppliers and representatives
//!
//! Tax identifiers are validated at this boundary and normalized before
//! persistence. Creation of customers and representatives notifies the
//! administrators through an explicit call to the notification service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::notification::{NotificationKind, NotificationService, NotifyInput};
use shared::{
    validate_fiscal_code, validate_iban, validate_vat_number, Customer, PaymentTerms,
    Representative, Supplier, SupplierCategory, TaxIdError,
};

/// Registry service
#[derive(Clone)]
pub struct RegistryService {
    db: PgPool,
    notifications: NotificationService,
}

/// Input for creating or updating a customer
#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vat_number: Option<String>,
    pub fiscal_code: Option<String>,
    pub payment_terms: Option<PaymentTerms>,
    pub notes: Option<String>,
}

/// Input for creating or updating a supplier
#[derive(Debug, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: String,
    pub email: String,
    pub vat_number: String,
    pub fiscal_code: Option<String>,
    pub iban: Option<String>,
    pub category: Option<SupplierCategory>,
    pub payment_terms: Option<PaymentTerms>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating or updating a representative
#[derive(Debug, Deserialize)]
pub struct RepresentativeInput {
    pub employee_id: Uuid,
    pub commission_percent: Decimal,
    pub territory: Option<String>,
    pub vat_number: Option<String>,
    pub fiscal_code: Option<String>,
    pub notes: Option<String>,
}

fn map_tax_id_error(field: &str, err: TaxIdError) -> AppError {
    match err {
        TaxIdError::InvalidFormat => AppError::InvalidFormat {
            field: field.to_string(),
        },
        TaxIdError::ChecksumMismatch => AppError::ChecksumMismatch {
            field: field.to_string(),
        },
    }
}

/// Validated and normalized tax identifiers
struct TaxIds {
    vat_number: Option<String>,
    fiscal_code: Option<String>,
}

fn validate_tax_ids(
    vat_number: Option<&str>,
    fiscal_code: Option<&str>,
) -> AppResult<TaxIds> {
    let vat_number = vat_number
        .filter(|v| !v.trim().is_empty())
        .map(|v| validate_vat_number(v).map_err(|e| map_tax_id_error("vat_number", e)))
        .transpose()?;
    let fiscal_code = fiscal_code
        .filter(|v| !v.trim().is_empty())
        .map(|v| validate_fiscal_code(v).map_err(|e| map_tax_id_error("fiscal_code", e)))
        .transpose()?;
    Ok(TaxIds {
        vat_number,
        fiscal_code,
    })
}

type CustomerRow = (
    Uuid,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    bool,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn customer_from_row(row: CustomerRow) -> Customer {
    Customer {
        id: row.0,
        name: row.1,
        address: row.2,
        city: row.3,
        postal_code: row.4,
        phone: row.5,
        email: row.6,
        vat_number: row.7,
        fiscal_code: row.8,
        payment_terms: PaymentTerms::from_str(&row.9).unwrap_or(PaymentTerms::Days30),
        is_active: row.10,
        notes: row.11,
        created_at: row.12,
        updated_at: row.13,
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, address, city, postal_code, phone, email, vat_number, \
                               fiscal_code, payment_terms, is_active, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    phone: String,
    email: String,
    vat_number: String,
    fiscal_code: Option<String>,
    iban: Option<String>,
    category: String,
    payment_terms: String,
    contact_name: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn supplier_from_row(row: SupplierRow) -> Supplier {
    Supplier {
        id: row.id,
        name: row.name,
        address: row.address,
        city: row.city,
        postal_code: row.postal_code,
        phone: row.phone,
        email: row.email,
        vat_number: row.vat_number,
        fiscal_code: row.fiscal_code,
        iban: row.iban,
        category: SupplierCategory::from_str(&row.category).unwrap_or(SupplierCategory::Other),
        payment_terms: PaymentTerms::from_str(&row.payment_terms).unwrap_or(PaymentTerms::Days30),
        contact_name: row.contact_name,
        contact_phone: row.contact_phone,
        contact_email: row.contact_email,
        is_active: row.is_active,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

const SUPPLIER_COLUMNS: &str = "id, name, address, city, postal_code, phone, email, vat_number, \
                               fiscal_code, iban, category, payment_terms, contact_name, \
                               contact_phone, contact_email, is_active, notes, created_at, updated_at";

type RepresentativeRow = (
    Uuid,
    Uuid,
    Decimal,
    Option<String>,
    Option<String>,
    Option<String>,
    bool,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn representative_from_row(row: RepresentativeRow) -> Representative {
    Representative {
        id: row.0,
        employee_id: row.1,
        commission_percent: row.2,
        territory: row.3,
        vat_number: row.4,
        fiscal_code: row.5,
        is_active: row.6,
        notes: row.7,
        created_at: row.8,
        updated_at: row.9,
    }
}

impl RegistryService {
    /// Create a new RegistryService instance
    pub fn new(db: PgPool, notifications: NotificationService) -> Self {
        Self { db, notifications }
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Create a customer. At least one of VAT number / fiscal code is
    /// required; administrators are notified of the new record.
    pub async fn create_customer(&self, acting_user: Uuid, input: CustomerInput) -> AppResult<Customer> {
        let tax_ids = validate_tax_ids(
            input.vat_number.as_deref(),
            input.fiscal_code.as_deref(),
        )?;

        if tax_ids.vat_number.is_none() && tax_ids.fiscal_code.is_none() {
            return Err(AppError::Validation {
                field: "vat_number".to_string(),
                message: "Provide at least one of VAT number or fiscal code".to_string(),
                message_it: "Specificare almeno Partita IVA o Codice Fiscale".to_string(),
            });
        }

        let payment_terms = input.payment_terms.unwrap_or(PaymentTerms::Days30);

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (name, address, city, postal_code, phone, email,
                                   vat_number, fiscal_code, payment_terms, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&tax_ids.vat_number)
        .bind(&tax_ids.fiscal_code)
        .bind(payment_terms.as_str())
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        let customer = customer_from_row(row);

        self.notify_admins(
            acting_user,
            NotificationKind::RegistryCreated,
            format!("New customer: {}", customer.name),
            format!("Customer {} was added to the registry.", customer.name),
        )
        .await?;

        Ok(customer)
    }

    /// List customers, active first
    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers ORDER BY is_active DESC, name",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(customer_from_row).collect())
    }

    /// Get a customer by id
    pub async fn get_customer(&self, customer_id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer_from_row(row))
    }

    /// Update a customer
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: CustomerInput,
    ) -> AppResult<Customer> {
        let tax_ids = validate_tax_ids(
            input.vat_number.as_deref(),
            input.fiscal_code.as_deref(),
        )?;

        if tax_ids.vat_number.is_none() && tax_ids.fiscal_code.is_none() {
            return Err(AppError::Validation {
                field: "vat_number".to_string(),
                message: "Provide at least one of VAT number or fiscal code".to_string(),
                message_it: "Specificare almeno Partita IVA o Codice Fiscale".to_string(),
            });
        }

        let payment_terms = input.payment_terms.unwrap_or(PaymentTerms::Days30);

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            UPDATE customers
            SET name = $1, address = $2, city = $3, postal_code = $4, phone = $5,
                email = $6, vat_number = $7, fiscal_code = $8, payment_terms = $9,
                notes = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&tax_ids.vat_number)
        .bind(&tax_ids.fiscal_code)
        .bind(payment_terms.as_str())
        .bind(&input.notes)
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer_from_row(row))
    }

    /// Soft-disable a customer
    pub async fn deactivate_customer(&self, customer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(customer_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    /// Create a supplier. VAT number is mandatory; the IBAN, when present,
    /// must be a well-formed Italian IBAN.
    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        let vat_number = validate_vat_number(&input.vat_number)
            .map_err(|e| map_tax_id_error("vat_number", e))?;
        let fiscal_code = input
            .fiscal_code
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| validate_fiscal_code(v).map_err(|e| map_tax_id_error("fiscal_code", e)))
            .transpose()?;
        let iban = input
            .iban
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| validate_iban(v).map_err(|e| map_tax_id_error("iban", e)))
            .transpose()?;

        let category = input.category.unwrap_or(SupplierCategory::Other);
        let payment_terms = input.payment_terms.unwrap_or(PaymentTerms::Days30);

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (name, address, city, postal_code, phone, email,
                                   vat_number, fiscal_code, iban, category, payment_terms,
                                   contact_name, contact_phone, contact_email, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&vat_number)
        .bind(&fiscal_code)
        .bind(&iban)
        .bind(category.as_str())
        .bind(payment_terms.as_str())
        .bind(&input.contact_name)
        .bind(&input.contact_phone)
        .bind(&input.contact_email)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier_from_row(row))
    }

    /// List suppliers, active first
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers ORDER BY is_active DESC, name",
            SUPPLIER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(supplier_from_row).collect())
    }

    /// Get a supplier by id
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers WHERE id = $1",
            SUPPLIER_COLUMNS
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier_from_row(row))
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: SupplierInput,
    ) -> AppResult<Supplier> {
        let vat_number = validate_vat_number(&input.vat_number)
            .map_err(|e| map_tax_id_error("vat_number", e))?;
        let fiscal_code = input
            .fiscal_code
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| validate_fiscal_code(v).map_err(|e| map_tax_id_error("fiscal_code", e)))
            .transpose()?;
        let iban = input
            .iban
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| validate_iban(v).map_err(|e| map_tax_id_error("iban", e)))
            .transpose()?;

        let category = input.category.unwrap_or(SupplierCategory::Other);
        let payment_terms = input.payment_terms.unwrap_or(PaymentTerms::Days30);

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, address = $2, city = $3, postal_code = $4, phone = $5,
                email = $6, vat_number = $7, fiscal_code = $8, iban = $9, category = $10,
                payment_terms = $11, contact_name = $12, contact_phone = $13,
                contact_email = $14, notes = $15, updated_at = NOW()
            WHERE id = $16
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&vat_number)
        .bind(&fiscal_code)
        .bind(&iban)
        .bind(category.as_str())
        .bind(payment_terms.as_str())
        .bind(&input.contact_name)
        .bind(&input.contact_phone)
        .bind(&input.contact_email)
        .bind(&input.notes)
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier_from_row(row))
    }

    /// Soft-disable a supplier
    pub async fn deactivate_supplier(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(supplier_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Representatives
    // ========================================================================

    /// Create a representative tied to an employee; administrators are
    /// notified of the new record.
    pub async fn create_representative(
        &self,
        acting_user: Uuid,
        input: RepresentativeInput,
    ) -> AppResult<Representative> {
        if input.commission_percent < Decimal::ZERO
            || input.commission_percent > Decimal::ONE_HUNDRED
        {
            return Err(AppError::Validation {
                field: "commission_percent".to_string(),
                message: "Commission must be between 0 and 100".to_string(),
                message_it: "La provvigione deve essere tra 0 e 100".to_string(),
            });
        }

        let tax_ids = validate_tax_ids(
            input.vat_number.as_deref(),
            input.fiscal_code.as_deref(),
        )?;

        let employee_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)",
        )
        .bind(input.employee_id)
        .fetch_one(&self.db)
        .await?;

        if !employee_exists {
            return Err(AppError::NotFound("Employee".to_string()));
        }

        let row = sqlx::query_as::<_, RepresentativeRow>(
            r#"
            INSERT INTO representatives (employee_id, commission_percent, territory,
                                         vat_number, fiscal_code, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, employee_id, commission_percent, territory, vat_number,
                      fiscal_code, is_active, notes, created_at, updated_at
            "#,
        )
        .bind(input.employee_id)
        .bind(input.commission_percent)
        .bind(&input.territory)
        .bind(&tax_ids.vat_number)
        .bind(&tax_ids.fiscal_code)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        self.notify_admins(
            acting_user,
            NotificationKind::RegistryCreated,
            "New representative".to_string(),
            "A commercial representative was added to the registry.".to_string(),
        )
        .await?;

        Ok(representative_from_row(row))
    }

    /// List representatives
    pub async fn list_representatives(&self) -> AppResult<Vec<Representative>> {
        let rows = sqlx::query_as::<_, RepresentativeRow>(
            r#"
            SELECT id, employee_id, commission_percent, territory, vat_number,
                   fiscal_code, is_active, notes, created_at, updated_at
            FROM representatives
            ORDER BY is_active DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(representative_from_row).collect())
    }

    /// Notify every administrator, with a mail copy where available.
    async fn notify_admins(
        &self,
        acting_user: Uuid,
        kind: NotificationKind,
        title: String,
        body: String,
    ) -> AppResult<()> {
        let admins = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, email FROM users WHERE role = 'admin' AND is_active = true",
        )
        .fetch_all(&self.db)
        .await?;

        for (admin_id, email) in admins {
            // The acting user does not need to hear about their own change
            if admin_id == acting_user {
                continue;
            }
            self.notifications
                .notify(NotifyInput {
                    user_id: admin_id,
                    kind,
                    title: title.clone(),
                    body: body.clone(),
                    email: Some(email),
                })
                .await?;
        }

        Ok(())
    }
}
