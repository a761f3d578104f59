//! Settlement service: loads trip and weekly sheet records, delegates to
//! the pure engine in the shared crate, and persists the computed totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::fish_type::FishTypeService;
use shared::{
    calculate_trip, calculate_week, AssignmentEntry, BillEntry, BillType, CreditEntry, CrewRole,
    ExpenseEntry, ExpenseStatus, TripBreakdown, TripSettlementInput, WeeklyBreakdown,
    WeeklyExpenseEntry, WeeklyExpenseStatus, WeeklySettlementInput,
};

/// Settlement service wrapping the pure calculators with record access
#[derive(Clone)]
pub struct SettlementService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct TripDateRow {
    id: Uuid,
    date: NaiveDate,
}

#[derive(Debug, sqlx::FromRow)]
struct BillCalcRow {
    bill_type: String,
    amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseCalcRow {
    status: String,
    amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentCalcRow {
    crew_member_id: Uuid,
    crew_member_name: String,
    role: String,
    helper_ratio: Option<Decimal>,
}

#[derive(Debug, sqlx::FromRow)]
struct CreditCalcRow {
    crew_member_id: Uuid,
    amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct SheetRangeRow {
    vessel_id: Uuid,
    week_start: NaiveDate,
    week_end: NaiveDate,
}

impl SettlementService {
    /// Create a new SettlementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Calculate the full financial breakdown for one trip.
    ///
    /// `weekly_expense_share` is this trip's allocated portion of
    /// week-level approved expenses; zero when settling standalone.
    pub async fn calculate_trip(
        &self,
        trip_id: Uuid,
        weekly_expense_share: Decimal,
    ) -> AppResult<TripBreakdown> {
        let trip = sqlx::query_as::<_, TripDateRow>("SELECT id, date FROM trips WHERE id = $1")
            .bind(trip_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip".to_string()))?;

        let input = self.load_trip_input(trip.id, trip.date).await?;

        Ok(calculate_trip(&input, weekly_expense_share))
    }

    /// Write the calculated totals back onto the trip record
    pub async fn apply_trip_totals(
        &self,
        conn: &mut PgConnection,
        trip_id: Uuid,
        breakdown: &TripBreakdown,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE trips
            SET total_sales = $2,
                balance = $3,
                net_total = $4,
                owner_share = $5,
                crew_share = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(trip_id)
        .bind(breakdown.revenue.total_sales)
        .bind(breakdown.distribution.balance)
        .bind(breakdown.distribution.net_total)
        .bind(breakdown.distribution.owner_share)
        .bind(breakdown.distribution.crew_share)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Aggregate the sheet's closed trips into weekly totals and final
    /// per-member payouts
    pub async fn calculate_week(&self, weekly_sheet_id: Uuid) -> AppResult<WeeklyBreakdown> {
        let sheet = sqlx::query_as::<_, SheetRangeRow>(
            "SELECT vessel_id, week_start, week_end FROM weekly_sheets WHERE id = $1",
        )
        .bind(weekly_sheet_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Weekly sheet".to_string()))?;

        let weekly_expenses = sqlx::query_as::<_, ExpenseCalcRow>(
            "SELECT status, amount FROM weekly_expenses WHERE weekly_sheet_id = $1",
        )
        .bind(weekly_sheet_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| WeeklyExpenseEntry {
            // Unknown statuses never count as approved
            status: WeeklyExpenseStatus::from_str(&row.status)
                .unwrap_or(WeeklyExpenseStatus::Pending),
            amount: row.amount,
        })
        .collect();

        let credits = sqlx::query_as::<_, CreditCalcRow>(
            "SELECT crew_member_id, amount FROM crew_credits WHERE weekly_sheet_id = $1",
        )
        .bind(weekly_sheet_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| CreditEntry {
            crew_member_id: row.crew_member_id,
            amount: row.amount,
        })
        .collect();

        let closed_trips = sqlx::query_as::<_, TripDateRow>(
            r#"
            SELECT id, date
            FROM trips
            WHERE vessel_id = $1 AND status = 'CLOSED' AND date BETWEEN $2 AND $3
            ORDER BY date, created_at
            "#,
        )
        .bind(sheet.vessel_id)
        .bind(sheet.week_start)
        .bind(sheet.week_end)
        .fetch_all(&self.db)
        .await?;

        let mut trips = Vec::with_capacity(closed_trips.len());
        for trip in closed_trips {
            trips.push(self.load_trip_input(trip.id, trip.date).await?);
        }

        Ok(calculate_week(&WeeklySettlementInput {
            weekly_expenses,
            credits,
            trips,
        }))
    }

    /// Write the aggregated totals back onto the weekly sheet
    pub async fn apply_weekly_totals(
        &self,
        conn: &mut PgConnection,
        weekly_sheet_id: Uuid,
        breakdown: &WeeklyBreakdown,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE weekly_sheets
            SET total_sales = $2,
                total_expenses = $3,
                owner_share = $4,
                crew_share = $5,
                total_weekly_payout = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(weekly_sheet_id)
        .bind(breakdown.revenue.total_sales)
        .bind(breakdown.expenses.total)
        .bind(breakdown.distribution.owner_share)
        .bind(breakdown.distribution.crew_share)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Create or update one payout record per (sheet, member).
    ///
    /// Keyed upsert, safe to re-run on reopen-and-refinalize.
    pub async fn upsert_weekly_payouts(
        &self,
        conn: &mut PgConnection,
        weekly_sheet_id: Uuid,
        breakdown: &WeeklyBreakdown,
    ) -> AppResult<()> {
        for payout in &breakdown.payouts {
            sqlx::query(
                r#"
                INSERT INTO weekly_payouts (weekly_sheet_id, crew_member_id, base_amount,
                                            credit_deduction, final_amount, is_paid)
                VALUES ($1, $2, $3, $4, $5, FALSE)
                ON CONFLICT (weekly_sheet_id, crew_member_id)
                DO UPDATE SET base_amount = EXCLUDED.base_amount,
                              credit_deduction = EXCLUDED.credit_deduction,
                              final_amount = EXCLUDED.final_amount,
                              updated_at = NOW()
                "#,
            )
            .bind(weekly_sheet_id)
            .bind(payout.crew_member_id)
            .bind(payout.base_amount)
            .bind(payout.credit_deduction)
            .bind(payout.final_amount)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Load one trip's bills, purchases, expenses and assignments and
    /// resolve the proper-fish rate for its date
    async fn load_trip_input(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<TripSettlementInput> {
        let bills = sqlx::query_as::<_, BillCalcRow>(
            "SELECT bill_type, amount FROM bills WHERE trip_id = $1",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| BillEntry {
            // Unrecognized bill types never count as revenue
            bill_type: BillType::from_str(&row.bill_type).unwrap_or(BillType::Other),
            amount: row.amount,
        })
        .collect();

        let purchase_amounts: Vec<Decimal> =
            sqlx::query_scalar("SELECT amount FROM fish_purchases WHERE trip_id = $1")
                .bind(trip_id)
                .fetch_all(&self.db)
                .await?;

        let expenses = sqlx::query_as::<_, ExpenseCalcRow>(
            "SELECT status, amount FROM expenses WHERE trip_id = $1",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| ExpenseEntry {
            // Unknown statuses behave like rejected: excluded everywhere
            status: ExpenseStatus::from_str(&row.status).unwrap_or(ExpenseStatus::Rejected),
            amount: row.amount,
        })
        .collect();

        let assignments = sqlx::query_as::<_, AssignmentCalcRow>(
            r#"
            SELECT a.crew_member_id, c.name AS crew_member_name, a.role, a.helper_ratio
            FROM trip_assignments a
            JOIN crew_members c ON c.id = a.crew_member_id
            WHERE a.trip_id = $1
            ORDER BY a.created_at
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| AssignmentEntry {
            crew_member_id: row.crew_member_id,
            crew_member_name: row.crew_member_name,
            // Unknown role strings keep the historical 0.5 default weight
            role: CrewRole::from_str(&row.role).unwrap_or(CrewRole::Helper),
            helper_ratio: row.helper_ratio,
        })
        .collect();

        let proper_fish_rate = FishTypeService::new(self.db.clone())
            .proper_fish_rate(date)
            .await?;

        Ok(TripSettlementInput {
            bills,
            purchase_amounts,
            expenses,
            assignments,
            proper_fish_rate,
        })
    }
}
