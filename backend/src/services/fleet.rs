//! Fleet service: vehicles, refueling, maintenance, documents and the
//! derived statistics snapshot
//!
//! Odometer readings are enforced to be non-decreasing on every refuel
//! write path. The statistics snapshot is a cache recomputed on demand from
//! the event streams; it never feeds back into them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    compute_fleet_statistics, derive_cost_per_liter, leg_consumptions,
    validate_odometer_progression, FleetStatistics, FuelType, MaintenanceEvent, MaintenanceKind,
    MaintenanceSample, RefuelSample, RefuelingEvent, Vehicle, VehicleDocument,
    VehicleDocumentKind,
};

/// Fleet service
#[derive(Clone)]
pub struct FleetService {
    db: PgPool,
}

/// Input for creating a vehicle
#[derive(Debug, Deserialize)]
pub struct CreateVehicleInput {
    pub plate: String,
    pub make: String,
    pub model: String,
    pub registration_year: i32,
    pub chassis_number: Option<String>,
    pub fuel_type_id: Option<Uuid>,
    pub starting_odometer_km: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
}

/// Input for updating a vehicle's assignment and flags
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleInput {
    pub assigned_to: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
}

/// Input for recording a refuel
#[derive(Debug, Deserialize)]
pub struct RecordRefuelInput {
    pub refuel_date: Option<NaiveDate>,
    pub odometer_km: i64,
    pub liters: Decimal,
    pub total_cost: Decimal,
    pub cost_per_liter: Option<Decimal>,
    pub station: Option<String>,
}

/// Input for planning a maintenance event
#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceInput {
    pub kind: MaintenanceKind,
    pub description: String,
    pub planned_date: NaiveDate,
    pub planned_cost: Option<Decimal>,
    pub odometer_km: Option<i64>,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
}

/// Input for completing a maintenance event
#[derive(Debug, Deserialize)]
pub struct CompleteMaintenanceInput {
    /// Defaults to today when absent
    pub actual_date: Option<NaiveDate>,
    pub actual_cost: Option<Decimal>,
}

/// Input for recording a vehicle document
#[derive(Debug, Deserialize)]
pub struct CreateDocumentInput {
    pub kind: VehicleDocumentKind,
    pub document_number: Option<String>,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

/// A refuel event joined with its leg distance and consumption
#[derive(Debug, Serialize)]
pub struct RefuelView {
    #[serde(flatten)]
    pub event: RefuelingEvent,
    pub km_since_previous: i64,
    /// Liters per 100 km over this leg; absent when no distance was covered
    pub consumption: Option<Decimal>,
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    plate: String,
    make: String,
    model: String,
    registration_year: i32,
    chassis_number: Option<String>,
    fuel_type_id: Option<Uuid>,
    starting_odometer_km: i64,
    current_odometer_km: i64,
    purchase_date: Option<NaiveDate>,
    purchase_cost: Option<Decimal>,
    assigned_to: Option<Uuid>,
    is_active: bool,
    is_available: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const VEHICLE_COLUMNS: &str = "id, plate, make, model, registration_year, chassis_number, \
                              fuel_type_id, starting_odometer_km, current_odometer_km, \
                              purchase_date, purchase_cost, assigned_to, is_active, \
                              is_available, notes, created_at, updated_at";

impl VehicleRow {
    fn into_vehicle(self) -> Vehicle {
        Vehicle {
            id: self.id,
            plate: self.plate,
            make: self.make,
            model: self.model,
            registration_year: self.registration_year,
            chassis_number: self.chassis_number,
            fuel_type_id: self.fuel_type_id,
            starting_odometer_km: self.starting_odometer_km,
            current_odometer_km: self.current_odometer_km,
            purchase_date: self.purchase_date,
            purchase_cost: self.purchase_cost,
            assigned_to: self.assigned_to,
            is_active: self.is_active,
            is_available: self.is_available,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RefuelRow {
    id: Uuid,
    vehicle_id: Uuid,
    refuel_date: NaiveDate,
    odometer_km: i64,
    liters: Decimal,
    total_cost: Decimal,
    cost_per_liter: Option<Decimal>,
    station: Option<String>,
    performed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

const REFUEL_COLUMNS: &str = "id, vehicle_id, refuel_date, odometer_km, liters, total_cost, \
                             cost_per_liter, station, performed_by, created_at";

impl RefuelRow {
    fn into_event(self) -> RefuelingEvent {
        RefuelingEvent {
            id: self.id,
            vehicle_id: self.vehicle_id,
            refuel_date: self.refuel_date,
            odometer_km: self.odometer_km,
            liters: self.liters,
            total_cost: self.total_cost,
            cost_per_liter: self.cost_per_liter,
            station: self.station,
            performed_by: self.performed_by,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MaintenanceRow {
    id: Uuid,
    vehicle_id: Uuid,
    kind: String,
    description: String,
    planned_date: NaiveDate,
    actual_date: Option<NaiveDate>,
    odometer_km: Option<i64>,
    planned_cost: Decimal,
    actual_cost: Option<Decimal>,
    is_completed: bool,
    assigned_to: Option<Uuid>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const MAINTENANCE_COLUMNS: &str = "id, vehicle_id, kind, description, planned_date, actual_date, \
                                  odometer_km, planned_cost, actual_cost, is_completed, \
                                  assigned_to, notes, created_at, updated_at";

impl MaintenanceRow {
    fn into_event(self) -> MaintenanceEvent {
        MaintenanceEvent {
            id: self.id,
            vehicle_id: self.vehicle_id,
            kind: MaintenanceKind::from_str(&self.kind).unwrap_or(MaintenanceKind::Other),
            description: self.description,
            planned_date: self.planned_date,
            actual_date: self.actual_date,
            odometer_km: self.odometer_km,
            planned_cost: self.planned_cost,
            actual_cost: self.actual_cost,
            is_completed: self.is_completed,
            assigned_to: self.assigned_to,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    vehicle_id: Uuid,
    kind: String,
    document_number: Option<String>,
    issue_date: NaiveDate,
    expiry_date: NaiveDate,
    cost: Decimal,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const DOCUMENT_COLUMNS: &str = "id, vehicle_id, kind, document_number, issue_date, expiry_date, \
                               cost, notes, created_at, updated_at";

impl DocumentRow {
    fn into_document(self) -> VehicleDocument {
        VehicleDocument {
            id: self.id,
            vehicle_id: self.vehicle_id,
            kind: VehicleDocumentKind::from_str(&self.kind).unwrap_or(VehicleDocumentKind::Other),
            document_number: self.document_number,
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            cost: self.cost,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl FleetService {
    /// Create a new FleetService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Vehicles
    // ========================================================================

    /// Register a vehicle
    pub async fn create_vehicle(&self, input: CreateVehicleInput) -> AppResult<Vehicle> {
        let plate = input.plate.trim().to_uppercase();
        if plate.is_empty() {
            return Err(AppError::Validation {
                field: "plate".to_string(),
                message: "Plate is required".to_string(),
                message_it: "La targa è obbligatoria".to_string(),
            });
        }

        let plate_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles WHERE plate = $1")
                .bind(&plate)
                .fetch_one(&self.db)
                .await?;

        if plate_taken > 0 {
            return Err(AppError::DuplicateEntry("plate".to_string()));
        }

        let starting = input.starting_odometer_km.unwrap_or(0);
        if starting < 0 {
            return Err(AppError::Validation {
                field: "starting_odometer_km".to_string(),
                message: "Odometer cannot be negative".to_string(),
                message_it: "Il chilometraggio non può essere negativo".to_string(),
            });
        }

        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
            INSERT INTO vehicles (plate, make, model, registration_year, chassis_number,
                                  fuel_type_id, starting_odometer_km, current_odometer_km,
                                  purchase_date, purchase_cost, assigned_to, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(&plate)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.registration_year)
        .bind(&input.chassis_number)
        .bind(input.fuel_type_id)
        .bind(starting)
        .bind(input.purchase_date)
        .bind(input.purchase_cost)
        .bind(input.assigned_to)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_vehicle())
    }

    /// List vehicles, active first
    pub async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles ORDER BY is_active DESC, plate",
            VEHICLE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(VehicleRow::into_vehicle).collect())
    }

    /// Get a vehicle by id
    pub async fn get_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles WHERE id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle".to_string()))?;

        Ok(row.into_vehicle())
    }

    /// Update a vehicle's assignment and flags
    pub async fn update_vehicle(
        &self,
        vehicle_id: Uuid,
        input: UpdateVehicleInput,
    ) -> AppResult<Vehicle> {
        let current = self.get_vehicle(vehicle_id).await?;

        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            r#"
            UPDATE vehicles
            SET assigned_to = $1, is_active = $2, is_available = $3, notes = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(input.assigned_to.or(current.assigned_to))
        .bind(input.is_active.unwrap_or(current.is_active))
        .bind(input.is_available.unwrap_or(current.is_available))
        .bind(input.notes.or(current.notes))
        .bind(vehicle_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_vehicle())
    }

    // ========================================================================
    // Refueling
    // ========================================================================

    /// Record a refuel.
    ///
    /// The odometer reading must not regress below the chronologically
    /// previous event (or the vehicle's starting odometer); the vehicle's
    /// current odometer advances to the highest recorded reading.
    pub async fn record_refuel(
        &self,
        vehicle_id: Uuid,
        performed_by: Uuid,
        input: RecordRefuelInput,
    ) -> AppResult<RefuelView> {
        if input.liters <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "liters".to_string(),
                message: "Liters must be positive".to_string(),
                message_it: "I litri devono essere positivi".to_string(),
            });
        }
        if input.total_cost < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "total_cost".to_string(),
                message: "Cost cannot be negative".to_string(),
                message_it: "Il costo non può essere negativo".to_string(),
            });
        }

        let refuel_date = input.refuel_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let vehicle = sqlx::query_as::<_, (i64, i64)>(
            "SELECT starting_odometer_km, current_odometer_km FROM vehicles WHERE id = $1 FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle".to_string()))?;

        let previous_km: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT odometer_km FROM refueling_events
            WHERE vehicle_id = $1 AND refuel_date <= $2
            ORDER BY refuel_date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(refuel_date)
        .fetch_optional(&mut *tx)
        .await?;

        let previous_km = previous_km.unwrap_or(vehicle.0);
        validate_odometer_progression(previous_km, input.odometer_km)?;

        let cost_per_liter = input
            .cost_per_liter
            .or_else(|| derive_cost_per_liter(input.total_cost, input.liters));

        let row = sqlx::query_as::<_, RefuelRow>(&format!(
            r#"
            INSERT INTO refueling_events (vehicle_id, refuel_date, odometer_km, liters,
                                          total_cost, cost_per_liter, station, performed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            REFUEL_COLUMNS
        ))
        .bind(vehicle_id)
        .bind(refuel_date)
        .bind(input.odometer_km)
        .bind(input.liters)
        .bind(input.total_cost)
        .bind(cost_per_liter)
        .bind(&input.station)
        .bind(performed_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE vehicles SET current_odometer_km = GREATEST(current_odometer_km, $1), updated_at = NOW() WHERE id = $2",
        )
        .bind(input.odometer_km)
        .bind(vehicle_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let km_since_previous = input.odometer_km - previous_km;
        let consumption = shared::consumption_per_100km(input.liters, km_since_previous);

        Ok(RefuelView {
            event: row.into_event(),
            km_since_previous,
            consumption,
        })
    }

    /// Chronological refuel history with per-leg consumption
    pub async fn list_refuels(&self, vehicle_id: Uuid) -> AppResult<Vec<RefuelView>> {
        let vehicle = self.get_vehicle(vehicle_id).await?;

        let rows = sqlx::query_as::<_, RefuelRow>(&format!(
            r#"
            SELECT {} FROM refueling_events
            WHERE vehicle_id = $1
            ORDER BY refuel_date, created_at
            "#,
            REFUEL_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_all(&self.db)
        .await?;

        let events: Vec<RefuelingEvent> = rows.into_iter().map(RefuelRow::into_event).collect();
        let samples: Vec<RefuelSample> = events
            .iter()
            .map(|e| RefuelSample {
                date: e.refuel_date,
                odometer_km: e.odometer_km,
                liters: e.liters,
                total_cost: e.total_cost,
            })
            .collect();
        let consumptions = leg_consumptions(vehicle.starting_odometer_km, &samples);

        let mut previous = vehicle.starting_odometer_km;
        Ok(events
            .into_iter()
            .zip(consumptions)
            .map(|(event, consumption)| {
                let km_since_previous = event.odometer_km - previous;
                previous = event.odometer_km;
                RefuelView {
                    event,
                    km_since_previous,
                    consumption,
                }
            })
            .collect())
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Plan a maintenance event
    pub async fn create_maintenance(
        &self,
        vehicle_id: Uuid,
        input: CreateMaintenanceInput,
    ) -> AppResult<MaintenanceEvent> {
        // Ensure the vehicle exists
        self.get_vehicle(vehicle_id).await?;

        let row = sqlx::query_as::<_, MaintenanceRow>(&format!(
            r#"
            INSERT INTO maintenance_events (vehicle_id, kind, description, planned_date,
                                            planned_cost, odometer_km, assigned_to, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(vehicle_id)
        .bind(input.kind.as_str())
        .bind(&input.description)
        .bind(input.planned_date)
        .bind(input.planned_cost.unwrap_or(Decimal::ZERO))
        .bind(input.odometer_km)
        .bind(input.assigned_to)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_event())
    }

    /// Mark a maintenance event as completed. The actual date defaults to
    /// today, keeping the completed-implies-dated invariant.
    pub async fn complete_maintenance(
        &self,
        maintenance_id: Uuid,
        input: CompleteMaintenanceInput,
    ) -> AppResult<MaintenanceEvent> {
        let actual_date = input.actual_date.unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query_as::<_, MaintenanceRow>(&format!(
            r#"
            UPDATE maintenance_events
            SET is_completed = true, actual_date = $1,
                actual_cost = COALESCE($2, actual_cost, planned_cost),
                updated_at = NOW()
            WHERE id = $3
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(actual_date)
        .bind(input.actual_cost)
        .bind(maintenance_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance event".to_string()))?;

        Ok(row.into_event())
    }

    /// List maintenance events for a vehicle, most recent plan first
    pub async fn list_maintenance(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceEvent>> {
        let rows = sqlx::query_as::<_, MaintenanceRow>(&format!(
            r#"
            SELECT {} FROM maintenance_events
            WHERE vehicle_id = $1
            ORDER BY planned_date DESC
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MaintenanceRow::into_event).collect())
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Record a vehicle document
    pub async fn create_document(
        &self,
        vehicle_id: Uuid,
        input: CreateDocumentInput,
    ) -> AppResult<VehicleDocument> {
        self.get_vehicle(vehicle_id).await?;

        if input.expiry_date < input.issue_date {
            return Err(AppError::Validation {
                field: "expiry_date".to_string(),
                message: "Expiry date cannot precede the issue date".to_string(),
                message_it: "La scadenza non può precedere la data di rilascio".to_string(),
            });
        }

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO vehicle_documents (vehicle_id, kind, document_number, issue_date,
                                           expiry_date, cost, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(vehicle_id)
        .bind(input.kind.as_str())
        .bind(&input.document_number)
        .bind(input.issue_date)
        .bind(input.expiry_date)
        .bind(input.cost.unwrap_or(Decimal::ZERO))
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_document())
    }

    /// List documents for a vehicle, soonest expiry first
    pub async fn list_documents(&self, vehicle_id: Uuid) -> AppResult<Vec<VehicleDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {} FROM vehicle_documents
            WHERE vehicle_id = $1
            ORDER BY expiry_date
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    /// Documents expiring within the given number of days across the fleet
    pub async fn list_expiring_documents(
        &self,
        days: Option<i64>,
    ) -> AppResult<Vec<VehicleDocument>> {
        let days = days.unwrap_or(30);
        let today = Utc::now().date_naive();

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {} FROM vehicle_documents
            WHERE expiry_date >= $1 AND expiry_date <= $2
            ORDER BY expiry_date
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(today)
        .bind(today + chrono::Duration::days(days))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    // ========================================================================
    // Fuel types
    // ========================================================================

    /// List fuel types
    pub async fn list_fuel_types(&self) -> AppResult<Vec<FuelType>> {
        let rows = sqlx::query_as::<_, (Uuid, String, Decimal)>(
            "SELECT id, name, cost_per_liter FROM fuel_types ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FuelType {
                id: row.0,
                name: row.1,
                cost_per_liter: row.2,
            })
            .collect())
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Recompute the statistics snapshot for a vehicle and persist it.
    ///
    /// Idempotent: reruns read the event streams fresh and overwrite the
    /// snapshot; the events themselves are never touched.
    pub async fn recompute_statistics(&self, vehicle_id: Uuid) -> AppResult<FleetStatistics> {
        let vehicle = self.get_vehicle(vehicle_id).await?;
        let today = Utc::now().date_naive();

        let refuels = sqlx::query_as::<_, (NaiveDate, i64, Decimal, Decimal)>(
            r#"
            SELECT refuel_date, odometer_km, liters, total_cost
            FROM refueling_events
            WHERE vehicle_id = $1
            ORDER BY refuel_date, created_at
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.db)
        .await?;

        let samples: Vec<RefuelSample> = refuels
            .into_iter()
            .map(|(date, odometer_km, liters, total_cost)| RefuelSample {
                date,
                odometer_km,
                liters,
                total_cost,
            })
            .collect();

        let maintenance = sqlx::query_as::<_, (Option<NaiveDate>, Option<Decimal>, bool)>(
            r#"
            SELECT actual_date, actual_cost, is_completed
            FROM maintenance_events
            WHERE vehicle_id = $1
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.db)
        .await?;

        let maintenance_samples: Vec<MaintenanceSample> = maintenance
            .into_iter()
            .map(|(actual_date, actual_cost, is_completed)| MaintenanceSample {
                actual_date,
                actual_cost,
                is_completed,
            })
            .collect();

        let stats = compute_fleet_statistics(
            vehicle.starting_odometer_km,
            &samples,
            &maintenance_samples,
            today,
        );

        sqlx::query(
            r#"
            INSERT INTO vehicle_statistics (vehicle_id, average_consumption, fuel_cost_per_km,
                                            yearly_maintenance_cost, total_km,
                                            last_refuel_date, last_maintenance_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (vehicle_id)
            DO UPDATE SET average_consumption = EXCLUDED.average_consumption,
                          fuel_cost_per_km = EXCLUDED.fuel_cost_per_km,
                          yearly_maintenance_cost = EXCLUDED.yearly_maintenance_cost,
                          total_km = EXCLUDED.total_km,
                          last_refuel_date = EXCLUDED.last_refuel_date,
                          last_maintenance_date = EXCLUDED.last_maintenance_date,
                          updated_at = NOW()
            "#,
        )
        .bind(vehicle_id)
        .bind(stats.average_consumption)
        .bind(stats.fuel_cost_per_km)
        .bind(stats.yearly_maintenance_cost)
        .bind(stats.total_km)
        .bind(stats.last_refuel_date)
        .bind(stats.last_maintenance_date)
        .execute(&self.db)
        .await?;

        Ok(stats)
    }
}
