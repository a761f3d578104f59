//! Trip lifecycle service: creation, crew assignment, bills, purchases,
//! expenses and the draft/ongoing/closed transitions

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::settlement::SettlementService;
use shared::{
    validate_amount, validate_assignment_ratio, validate_purchase_amount, Bill, BillType, CrewRole,
    Expense, ExpenseStatus, FishPurchase, Trip, TripAssignment, TripBreakdown, TripStatus,
};

/// Trip service managing the per-trip lifecycle
#[derive(Clone)]
pub struct TripService {
    db: PgPool,
}

/// Database row for a trip
#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    vessel_id: Uuid,
    weekly_sheet_id: Option<Uuid>,
    date: NaiveDate,
    day_of_week: Option<String>,
    is_fishing_day: bool,
    status: String,
    total_sales: Decimal,
    balance: Decimal,
    net_total: Decimal,
    owner_share: Decimal,
    crew_share: Decimal,
    notes: Option<String>,
    closed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            vessel_id: row.vessel_id,
            weekly_sheet_id: row.weekly_sheet_id,
            date: row.date,
            day_of_week: row.day_of_week,
            is_fishing_day: row.is_fishing_day,
            status: TripStatus::from_str(&row.status).unwrap_or(TripStatus::Draft),
            total_sales: row.total_sales,
            balance: row.balance,
            net_total: row.net_total,
            owner_share: row.owner_share,
            crew_share: row.crew_share,
            notes: row.notes,
            closed_at: row.closed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TRIP_COLUMNS: &str = "id, vessel_id, weekly_sheet_id, date, day_of_week, is_fishing_day, \
     status, total_sales, balance, net_total, owner_share, crew_share, notes, closed_at, \
     created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    trip_id: Uuid,
    bill_type: String,
    bill_no: Option<String>,
    vendor: Option<String>,
    description: Option<String>,
    amount: Decimal,
    bill_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BillRow> for Bill {
    fn from(row: BillRow) -> Self {
        Bill {
            id: row.id,
            trip_id: row.trip_id,
            bill_type: BillType::from_str(&row.bill_type).unwrap_or(BillType::Other),
            bill_no: row.bill_no,
            vendor: row.vendor,
            description: row.description,
            amount: row.amount,
            bill_date: row.bill_date,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FishPurchaseRow {
    id: Uuid,
    trip_id: Uuid,
    fish_type_id: Uuid,
    kilos: Decimal,
    rate_per_kilo: Decimal,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<FishPurchaseRow> for FishPurchase {
    fn from(row: FishPurchaseRow) -> Self {
        FishPurchase {
            id: row.id,
            trip_id: row.trip_id,
            fish_type_id: row.fish_type_id,
            kilos: row.kilos,
            rate_per_kilo: row.rate_per_kilo,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    trip_id: Uuid,
    amount: Decimal,
    description: Option<String>,
    expense_type: Option<String>,
    status: String,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            trip_id: row.trip_id,
            amount: row.amount,
            description: row.description,
            expense_type: row.expense_type,
            status: ExpenseStatus::from_str(&row.status).unwrap_or(ExpenseStatus::Pending),
            approved_at: row.approved_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TripAssignmentRow {
    id: Uuid,
    trip_id: Uuid,
    crew_member_id: Uuid,
    role: String,
    helper_ratio: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<TripAssignmentRow> for TripAssignment {
    fn from(row: TripAssignmentRow) -> Self {
        TripAssignment {
            id: row.id,
            trip_id: row.trip_id,
            crew_member_id: row.crew_member_id,
            role: CrewRole::from_str(&row.role).unwrap_or(CrewRole::Helper),
            helper_ratio: row.helper_ratio,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a trip
#[derive(Debug, Deserialize)]
pub struct CreateTripInput {
    pub vessel_id: Uuid,
    pub weekly_sheet_id: Option<Uuid>,
    pub date: NaiveDate,
    pub day_of_week: Option<String>,
    pub is_fishing_day: Option<bool>,
    pub notes: Option<String>,
}

/// Input for updating trip basics
#[derive(Debug, Deserialize)]
pub struct UpdateTripInput {
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub is_fishing_day: Option<bool>,
    pub notes: Option<String>,
}

/// One crew assignment in a replace-all request
#[derive(Debug, Deserialize)]
pub struct AssignCrewInput {
    pub crew_member_id: Uuid,
    pub role: CrewRole,
    pub helper_ratio: Option<Decimal>,
}

/// One bill in an add-bills request
#[derive(Debug, Deserialize)]
pub struct AddBillInput {
    pub bill_type: BillType,
    pub bill_no: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub bill_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One purchase in an add-purchases request; the amount must equal
/// kilos x rate
#[derive(Debug, Deserialize)]
pub struct AddPurchaseInput {
    pub fish_type_id: Uuid,
    pub kilos: Decimal,
    pub rate_per_kilo: Decimal,
    pub amount: Decimal,
}

/// One expense in an add-expenses request; created as PENDING
#[derive(Debug, Deserialize)]
pub struct AddExpenseInput {
    pub amount: Decimal,
    pub description: Option<String>,
    pub expense_type: Option<String>,
}

/// Trip record together with its live financial breakdown
#[derive(Debug, Serialize)]
pub struct TripWithBreakdown {
    pub trip: Trip,
    pub calculations: TripBreakdown,
}

/// Filters for listing trips
#[derive(Debug, Default, Deserialize)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub vessel_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl TripService {
    /// Create a new TripService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a trip in DRAFT status
    pub async fn create_trip(&self, input: CreateTripInput) -> AppResult<Trip> {
        if input.date > Utc::now().date_naive() {
            return Err(AppError::Validation {
                field: "date".to_string(),
                message: "Trip date cannot be in the future".to_string(),
            });
        }

        let row = sqlx::query_as::<_, TripRow>(&format!(
            r#"
            INSERT INTO trips (vessel_id, weekly_sheet_id, date, day_of_week, is_fishing_day,
                               status, total_sales, balance, net_total, owner_share, crew_share,
                               notes)
            VALUES ($1, $2, $3, $4, $5, 'DRAFT', 0, 0, 0, 0, 0, $6)
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(input.vessel_id)
        .bind(input.weekly_sheet_id)
        .bind(input.date)
        .bind(&input.day_of_week)
        .bind(input.is_fishing_day.unwrap_or(true))
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a trip together with its live breakdown
    pub async fn get_trip(&self, trip_id: Uuid) -> AppResult<TripWithBreakdown> {
        let trip = self.fetch_trip(trip_id).await?;
        let calculations = SettlementService::new(self.db.clone())
            .calculate_trip(trip_id, Decimal::ZERO)
            .await?;

        Ok(TripWithBreakdown { trip, calculations })
    }

    /// List trips with optional status/vessel/date filters
    pub async fn list_trips(&self, filter: TripFilter) -> AppResult<Vec<Trip>> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM trips
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vessel_id = $2)
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.vessel_id)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update trip basics; recalculates stored totals for trips that
    /// already left DRAFT
    pub async fn update_trip(&self, trip_id: Uuid, input: UpdateTripInput) -> AppResult<Trip> {
        let trip = self.fetch_trip(trip_id).await?;

        if let Some(date) = input.date {
            if date > Utc::now().date_naive() {
                return Err(AppError::Validation {
                    field: "date".to_string(),
                    message: "Trip date cannot be in the future".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, TripRow>(&format!(
            r#"
            UPDATE trips
            SET date = COALESCE($2, date),
                day_of_week = COALESCE($3, day_of_week),
                is_fishing_day = COALESCE($4, is_fishing_day),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(trip_id)
        .bind(input.date)
        .bind(&input.day_of_week)
        .bind(input.is_fishing_day)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        if matches!(trip.status, TripStatus::Ongoing | TripStatus::Closed) {
            self.recalculate_and_store(trip_id).await?;
            return self.fetch_trip(trip_id).await;
        }

        Ok(row.into())
    }

    /// Replace the trip's crew assignments.
    ///
    /// A member may appear several times with distinct roles; duplicate
    /// (member, role) pairs are rejected.
    pub async fn assign_crew(
        &self,
        trip_id: Uuid,
        assignments: Vec<AssignCrewInput>,
    ) -> AppResult<Vec<TripAssignment>> {
        let trip = self.fetch_trip(trip_id).await?;
        self.ensure_editable(&trip)?;

        for (i, a) in assignments.iter().enumerate() {
            validate_assignment_ratio(a.role, a.helper_ratio).map_err(|msg| {
                AppError::Validation {
                    field: format!("assignments[{}].helper_ratio", i),
                    message: msg.to_string(),
                }
            })?;

            let duplicate = assignments[..i]
                .iter()
                .any(|b| b.crew_member_id == a.crew_member_id && b.role == a.role);
            if duplicate {
                return Err(AppError::DuplicateEntry(format!(
                    "assignment for member {} with role {}",
                    a.crew_member_id, a.role
                )));
            }
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM trip_assignments WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(assignments.len());
        for a in &assignments {
            let row = sqlx::query_as::<_, TripAssignmentRow>(
                r#"
                INSERT INTO trip_assignments (trip_id, crew_member_id, role, helper_ratio)
                VALUES ($1, $2, $3, $4)
                RETURNING id, trip_id, crew_member_id, role, helper_ratio, created_at
                "#,
            )
            .bind(trip_id)
            .bind(a.crew_member_id)
            .bind(a.role.as_str())
            .bind(a.helper_ratio)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Record sale bills against the trip
    pub async fn add_bills(&self, trip_id: Uuid, bills: Vec<AddBillInput>) -> AppResult<Vec<Bill>> {
        let trip = self.fetch_trip(trip_id).await?;
        self.ensure_editable(&trip)?;

        for (i, bill) in bills.iter().enumerate() {
            validate_amount(bill.amount).map_err(|msg| AppError::Validation {
                field: format!("bills[{}].amount", i),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let mut created = Vec::with_capacity(bills.len());
        for bill in &bills {
            let row = sqlx::query_as::<_, BillRow>(
                r#"
                INSERT INTO bills (trip_id, bill_type, bill_no, vendor, description, amount,
                                   bill_date, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, trip_id, bill_type, bill_no, vendor, description, amount,
                          bill_date, notes, created_at
                "#,
            )
            .bind(trip_id)
            .bind(bill.bill_type.as_str())
            .bind(&bill.bill_no)
            .bind(&bill.vendor)
            .bind(&bill.description)
            .bind(bill.amount)
            .bind(bill.bill_date)
            .bind(&bill.notes)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Record fish purchases; the stored amount is kilos x rate
    pub async fn add_purchases(
        &self,
        trip_id: Uuid,
        purchases: Vec<AddPurchaseInput>,
    ) -> AppResult<Vec<FishPurchase>> {
        let trip = self.fetch_trip(trip_id).await?;
        self.ensure_editable(&trip)?;

        for (i, p) in purchases.iter().enumerate() {
            validate_purchase_amount(p.kilos, p.rate_per_kilo, p.amount).map_err(|msg| {
                AppError::Validation {
                    field: format!("purchases[{}]", i),
                    message: msg.to_string(),
                }
            })?;
        }

        let mut tx = self.db.begin().await?;

        let mut created = Vec::with_capacity(purchases.len());
        for p in &purchases {
            let row = sqlx::query_as::<_, FishPurchaseRow>(
                r#"
                INSERT INTO fish_purchases (trip_id, fish_type_id, kilos, rate_per_kilo, amount)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, trip_id, fish_type_id, kilos, rate_per_kilo, amount, created_at
                "#,
            )
            .bind(trip_id)
            .bind(p.fish_type_id)
            .bind(p.kilos)
            .bind(p.rate_per_kilo)
            .bind(p.amount)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Record trip expenses; all start PENDING until approved
    pub async fn add_expenses(
        &self,
        trip_id: Uuid,
        expenses: Vec<AddExpenseInput>,
    ) -> AppResult<Vec<Expense>> {
        let trip = self.fetch_trip(trip_id).await?;
        self.ensure_editable(&trip)?;

        for (i, e) in expenses.iter().enumerate() {
            validate_amount(e.amount).map_err(|msg| AppError::Validation {
                field: format!("expenses[{}].amount", i),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let mut created = Vec::with_capacity(expenses.len());
        for e in &expenses {
            let row = sqlx::query_as::<_, ExpenseRow>(
                r#"
                INSERT INTO expenses (trip_id, amount, description, expense_type, status)
                VALUES ($1, $2, $3, $4, 'PENDING')
                RETURNING id, trip_id, amount, description, expense_type, status, approved_at,
                          created_at
                "#,
            )
            .bind(trip_id)
            .bind(e.amount)
            .bind(&e.description)
            .bind(&e.expense_type)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Approve or reject a pending expense
    pub async fn review_expense(
        &self,
        trip_id: Uuid,
        expense_id: Uuid,
        approve: bool,
    ) -> AppResult<Expense> {
        let status = if approve {
            ExpenseStatus::Approved
        } else {
            ExpenseStatus::Rejected
        };

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            UPDATE expenses
            SET status = $3,
                approved_at = CASE WHEN $3 = 'APPROVED' THEN NOW() ELSE NULL END
            WHERE id = $2 AND trip_id = $1
            RETURNING id, trip_id, amount, description, expense_type, status, approved_at,
                      created_at
            "#,
        )
        .bind(trip_id)
        .bind(expense_id)
        .bind(status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(row.into())
    }

    /// Finalize a draft trip: requires crew, recalculates and moves to
    /// ONGOING
    pub async fn finalize_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let trip = self.fetch_trip(trip_id).await?;

        if trip.status != TripStatus::Draft {
            return Err(AppError::InvalidStateTransition(
                "Only draft trips can be finalized".to_string(),
            ));
        }

        let assignment_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trip_assignments WHERE trip_id = $1")
                .bind(trip_id)
                .fetch_one(&self.db)
                .await?;

        if assignment_count == 0 {
            return Err(AppError::ValidationError(
                "Cannot finalize a trip without crew assignments".to_string(),
            ));
        }

        let breakdown = SettlementService::new(self.db.clone())
            .calculate_trip(trip_id, Decimal::ZERO)
            .await?;

        let mut tx = self.db.begin().await?;
        SettlementService::new(self.db.clone())
            .apply_trip_totals(&mut tx, trip_id, &breakdown)
            .await?;
        sqlx::query("UPDATE trips SET status = 'ONGOING', updated_at = NOW() WHERE id = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.fetch_trip(trip_id).await
    }

    /// Close a trip: recalculates, stores totals and stamps closed_at.
    /// Only closed trips enter weekly aggregation.
    pub async fn close_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let trip = self.fetch_trip(trip_id).await?;

        if trip.status == TripStatus::Closed {
            return Err(AppError::InvalidStateTransition(
                "Trip is already closed".to_string(),
            ));
        }

        let breakdown = SettlementService::new(self.db.clone())
            .calculate_trip(trip_id, Decimal::ZERO)
            .await?;

        let mut tx = self.db.begin().await?;
        SettlementService::new(self.db.clone())
            .apply_trip_totals(&mut tx, trip_id, &breakdown)
            .await?;
        sqlx::query(
            "UPDATE trips SET status = 'CLOSED', closed_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.fetch_trip(trip_id).await
    }

    /// Reopen a closed trip back to ONGOING
    pub async fn reopen_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let trip = self.fetch_trip(trip_id).await?;

        if trip.status != TripStatus::Closed {
            return Err(AppError::InvalidStateTransition(
                "Only closed trips can be reopened".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE trips SET status = 'ONGOING', closed_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(trip_id)
        .execute(&self.db)
        .await?;

        self.fetch_trip(trip_id).await
    }

    /// Recompute and persist the trip's stored totals
    async fn recalculate_and_store(&self, trip_id: Uuid) -> AppResult<()> {
        let settlement = SettlementService::new(self.db.clone());
        let breakdown = settlement.calculate_trip(trip_id, Decimal::ZERO).await?;

        let mut conn = self.db.acquire().await?;
        settlement
            .apply_trip_totals(&mut conn, trip_id, &breakdown)
            .await?;

        Ok(())
    }

    async fn fetch_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let row = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1"
        ))
        .bind(trip_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        Ok(row.into())
    }

    fn ensure_editable(&self, trip: &Trip) -> AppResult<()> {
        if !trip.status.is_editable() {
            return Err(AppError::InvalidStateTransition(
                "Closed trips cannot be modified; reopen the trip first".to_string(),
            ));
        }
        Ok(())
    }
}
