//! Employee service: personnel records and daily time tracking

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_fiscal_code, AbsenceKind, Employee, Role, TaxIdError, WorkDay};

/// Employee service
#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

/// Input for creating or updating an employee
#[derive(Debug, Deserialize)]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub fiscal_code: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub id_card_number: Option<String>,
    pub id_card_expiry: Option<NaiveDate>,
    pub licence_number: Option<String>,
    pub licence_expiry: Option<NaiveDate>,
    pub licence_categories: Option<String>,
    pub notes: Option<String>,
}

/// Input for recording or updating a work day
#[derive(Debug, Deserialize)]
pub struct WorkDayInput {
    pub work_date: NaiveDate,
    pub morning_start: Option<NaiveTime>,
    pub morning_end: Option<NaiveTime>,
    pub afternoon_start: Option<NaiveTime>,
    pub afternoon_end: Option<NaiveTime>,
    pub absence: Option<AbsenceKind>,
    pub absence_note: Option<String>,
    pub is_closed: Option<bool>,
}

/// A work day with its computed hours
#[derive(Debug, Serialize)]
pub struct WorkDayView {
    #[serde(flatten)]
    pub work_day: WorkDay,
    pub worked_minutes: i64,
}

impl WorkDayView {
    fn from_work_day(work_day: WorkDay) -> Self {
        let worked_minutes = work_day.worked_hours().num_minutes();
        Self {
            work_day,
            worked_minutes,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    user_id: Option<Uuid>,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    role: String,
    fiscal_code: Option<String>,
    birth_date: Option<NaiveDate>,
    hire_date: Option<NaiveDate>,
    id_card_number: Option<String>,
    id_card_expiry: Option<NaiveDate>,
    licence_number: Option<String>,
    licence_expiry: Option<NaiveDate>,
    licence_categories: Option<String>,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const EMPLOYEE_COLUMNS: &str = "id, user_id, first_name, last_name, email, phone, address, role, \
                               fiscal_code, birth_date, hire_date, id_card_number, id_card_expiry, \
                               licence_number, licence_expiry, licence_categories, is_active, \
                               notes, created_at, updated_at";

impl EmployeeRow {
    fn into_employee(self) -> Employee {
        Employee {
            id: self.id,
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            role: Role::from_str(&self.role).unwrap_or(Role::Operator),
            fiscal_code: self.fiscal_code,
            birth_date: self.birth_date,
            hire_date: self.hire_date,
            id_card_number: self.id_card_number,
            id_card_expiry: self.id_card_expiry,
            licence_number: self.licence_number,
            licence_expiry: self.licence_expiry,
            licence_categories: self.licence_categories,
            is_active: self.is_active,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkDayRow {
    id: Uuid,
    employee_id: Uuid,
    work_date: NaiveDate,
    morning_start: Option<NaiveTime>,
    morning_end: Option<NaiveTime>,
    afternoon_start: Option<NaiveTime>,
    afternoon_end: Option<NaiveTime>,
    absence: String,
    absence_note: Option<String>,
    is_closed: bool,
    is_confirmed: bool,
    confirmed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const WORK_DAY_COLUMNS: &str = "id, employee_id, work_date, morning_start, morning_end, \
                               afternoon_start, afternoon_end, absence, absence_note, is_closed, \
                               is_confirmed, confirmed_by, created_at, updated_at";

impl WorkDayRow {
    fn into_work_day(self) -> WorkDay {
        WorkDay {
            id: self.id,
            employee_id: self.employee_id,
            work_date: self.work_date,
            morning_start: self.morning_start,
            morning_end: self.morning_end,
            afternoon_start: self.afternoon_start,
            afternoon_end: self.afternoon_end,
            absence: AbsenceKind::from_str(&self.absence).unwrap_or_default(),
            absence_note: self.absence_note,
            is_closed: self.is_closed,
            is_confirmed: self.is_confirmed,
            confirmed_by: self.confirmed_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn map_fiscal_code(raw: Option<&str>) -> AppResult<Option<String>> {
    raw.filter(|v| !v.trim().is_empty())
        .map(|v| {
            validate_fiscal_code(v).map_err(|err| match err {
                TaxIdError::InvalidFormat => AppError::InvalidFormat {
                    field: "fiscal_code".to_string(),
                },
                TaxIdError::ChecksumMismatch => AppError::ChecksumMismatch {
                    field: "fiscal_code".to_string(),
                },
            })
        })
        .transpose()
}

impl EmployeeService {
    /// Create a new EmployeeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an employee
    pub async fn create_employee(&self, input: EmployeeInput) -> AppResult<Employee> {
        let fiscal_code = map_fiscal_code(input.fiscal_code.as_deref())?;
        let role = input.role.unwrap_or(Role::Operator);

        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            INSERT INTO employees (first_name, last_name, email, phone, address, role,
                                   fiscal_code, birth_date, hire_date, id_card_number,
                                   id_card_expiry, licence_number, licence_expiry,
                                   licence_categories, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(role.as_str())
        .bind(&fiscal_code)
        .bind(input.birth_date)
        .bind(input.hire_date)
        .bind(&input.id_card_number)
        .bind(input.id_card_expiry)
        .bind(&input.licence_number)
        .bind(input.licence_expiry)
        .bind(&input.licence_categories)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_employee())
    }

    /// List employees, active first
    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees ORDER BY is_active DESC, last_name, first_name",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(EmployeeRow::into_employee).collect())
    }

    /// Get an employee by id
    pub async fn get_employee(&self, employee_id: Uuid) -> AppResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(employee_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(row.into_employee())
    }

    /// Update an employee
    pub async fn update_employee(
        &self,
        employee_id: Uuid,
        input: EmployeeInput,
    ) -> AppResult<Employee> {
        let fiscal_code = map_fiscal_code(input.fiscal_code.as_deref())?;
        let role = input.role.unwrap_or(Role::Operator);

        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            UPDATE employees
            SET first_name = $1, last_name = $2, email = $3, phone = $4, address = $5,
                role = $6, fiscal_code = $7, birth_date = $8, hire_date = $9,
                id_card_number = $10, id_card_expiry = $11, licence_number = $12,
                licence_expiry = $13, licence_categories = $14, notes = $15,
                updated_at = NOW()
            WHERE id = $16
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(role.as_str())
        .bind(&fiscal_code)
        .bind(input.birth_date)
        .bind(input.hire_date)
        .bind(&input.id_card_number)
        .bind(input.id_card_expiry)
        .bind(&input.licence_number)
        .bind(input.licence_expiry)
        .bind(&input.licence_categories)
        .bind(&input.notes)
        .bind(employee_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(row.into_employee())
    }

    /// Soft-disable an employee
    pub async fn deactivate_employee(&self, employee_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE employees SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(employee_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Work days
    // ========================================================================

    /// Record or update the work day of an employee (one per date)
    pub async fn record_work_day(
        &self,
        employee_id: Uuid,
        input: WorkDayInput,
    ) -> AppResult<WorkDayView> {
        self.get_employee(employee_id).await?;

        let absence = input.absence.unwrap_or_default();

        let row = sqlx::query_as::<_, WorkDayRow>(&format!(
            r#"
            INSERT INTO work_days (employee_id, work_date, morning_start, morning_end,
                                   afternoon_start, afternoon_end, absence, absence_note,
                                   is_closed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (employee_id, work_date)
            DO UPDATE SET morning_start = EXCLUDED.morning_start,
                          morning_end = EXCLUDED.morning_end,
                          afternoon_start = EXCLUDED.afternoon_start,
                          afternoon_end = EXCLUDED.afternoon_end,
                          absence = EXCLUDED.absence,
                          absence_note = EXCLUDED.absence_note,
                          is_closed = EXCLUDED.is_closed,
                          updated_at = NOW()
            RETURNING {}
            "#,
            WORK_DAY_COLUMNS
        ))
        .bind(employee_id)
        .bind(input.work_date)
        .bind(input.morning_start)
        .bind(input.morning_end)
        .bind(input.afternoon_start)
        .bind(input.afternoon_end)
        .bind(absence.as_str())
        .bind(&input.absence_note)
        .bind(input.is_closed.unwrap_or(false))
        .fetch_one(&self.db)
        .await?;

        Ok(WorkDayView::from_work_day(row.into_work_day()))
    }

    /// Confirm a closed work day
    pub async fn confirm_work_day(
        &self,
        work_day_id: Uuid,
        confirmed_by: Uuid,
    ) -> AppResult<WorkDayView> {
        let row = sqlx::query_as::<_, WorkDayRow>(&format!(
            r#"
            UPDATE work_days
            SET is_confirmed = true, confirmed_by = $1, updated_at = NOW()
            WHERE id = $2 AND is_closed = true
            RETURNING {}
            "#,
            WORK_DAY_COLUMNS
        ))
        .bind(confirmed_by)
        .bind(work_day_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Conflict {
            resource: "work_day".to_string(),
            message: "Only closed work days can be confirmed".to_string(),
            message_it: "Solo le giornate chiuse possono essere confermate".to_string(),
        })?;

        Ok(WorkDayView::from_work_day(row.into_work_day()))
    }

    /// List work days of an employee within a date range
    pub async fn list_work_days(
        &self,
        employee_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<WorkDayView>> {
        let rows = sqlx::query_as::<_, WorkDayRow>(&format!(
            r#"
            SELECT {} FROM work_days
            WHERE employee_id = $1
              AND ($2::date IS NULL OR work_date >= $2)
              AND ($3::date IS NULL OR work_date <= $3)
            ORDER BY work_date DESC
            "#,
            WORK_DAY_COLUMNS
        ))
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| WorkDayView::from_work_day(row.into_work_day()))
            .collect())
    }
}
