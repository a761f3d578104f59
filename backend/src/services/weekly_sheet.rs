//! Weekly sheet service: settlement windows, weekly expenses, crew
//! credits and the finalize/reopen/mark-paid transitions

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::settlement::SettlementService;
use shared::{
    validate_amount, validate_week_range, CrewCredit, WeeklyBreakdown, WeeklyExpense,
    WeeklyExpenseStatus, WeeklyPayout, WeeklySheet, WeeklySheetStatus,
};

/// Weekly sheet service
#[derive(Clone)]
pub struct WeeklySheetService {
    db: PgPool,
}

/// Database row for a weekly sheet
#[derive(Debug, sqlx::FromRow)]
struct WeeklySheetRow {
    id: Uuid,
    vessel_id: Uuid,
    week_start: NaiveDate,
    week_end: NaiveDate,
    label: Option<String>,
    description: Option<String>,
    status: String,
    total_sales: Decimal,
    total_expenses: Decimal,
    total_weekly_payout: Decimal,
    owner_share: Decimal,
    crew_share: Decimal,
    processed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WeeklySheetRow> for WeeklySheet {
    fn from(row: WeeklySheetRow) -> Self {
        WeeklySheet {
            id: row.id,
            vessel_id: row.vessel_id,
            week_start: row.week_start,
            week_end: row.week_end,
            label: row.label,
            description: row.description,
            status: WeeklySheetStatus::from_str(&row.status).unwrap_or(WeeklySheetStatus::Draft),
            total_sales: row.total_sales,
            total_expenses: row.total_expenses,
            total_weekly_payout: row.total_weekly_payout,
            owner_share: row.owner_share,
            crew_share: row.crew_share,
            processed_at: row.processed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SHEET_COLUMNS: &str = "id, vessel_id, week_start, week_end, label, description, status, \
     total_sales, total_expenses, total_weekly_payout, owner_share, crew_share, processed_at, \
     created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct WeeklyExpenseRow {
    id: Uuid,
    weekly_sheet_id: Uuid,
    category: Option<String>,
    amount: Decimal,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<WeeklyExpenseRow> for WeeklyExpense {
    fn from(row: WeeklyExpenseRow) -> Self {
        WeeklyExpense {
            id: row.id,
            weekly_sheet_id: row.weekly_sheet_id,
            category: row.category,
            amount: row.amount,
            description: row.description,
            status: WeeklyExpenseStatus::from_str(&row.status)
                .unwrap_or(WeeklyExpenseStatus::Pending),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CrewCreditRow {
    id: Uuid,
    weekly_sheet_id: Uuid,
    crew_member_id: Uuid,
    amount: Decimal,
    description: Option<String>,
    credit_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<CrewCreditRow> for CrewCredit {
    fn from(row: CrewCreditRow) -> Self {
        CrewCredit {
            id: row.id,
            weekly_sheet_id: row.weekly_sheet_id,
            crew_member_id: row.crew_member_id,
            amount: row.amount,
            description: row.description,
            credit_date: row.credit_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WeeklyPayoutRow {
    id: Uuid,
    weekly_sheet_id: Uuid,
    crew_member_id: Uuid,
    base_amount: Decimal,
    credit_deduction: Decimal,
    final_amount: Decimal,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WeeklyPayoutRow> for WeeklyPayout {
    fn from(row: WeeklyPayoutRow) -> Self {
        WeeklyPayout {
            id: row.id,
            weekly_sheet_id: row.weekly_sheet_id,
            crew_member_id: row.crew_member_id,
            base_amount: row.base_amount,
            credit_deduction: row.credit_deduction,
            final_amount: row.final_amount,
            is_paid: row.is_paid,
            paid_at: row.paid_at,
            payment_reference: row.payment_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for opening a settlement week
#[derive(Debug, Deserialize)]
pub struct CreateWeeklySheetInput {
    pub vessel_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub label: Option<String>,
    pub description: Option<String>,
}

/// One expense in an add-weekly-expenses request; created as PENDING
#[derive(Debug, Deserialize)]
pub struct AddWeeklyExpenseInput {
    pub category: Option<String>,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// One credit in an add-credits request
#[derive(Debug, Deserialize)]
pub struct AddCreditInput {
    pub crew_member_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub credit_date: Option<DateTime<Utc>>,
}

/// Input for marking a sheet's payouts as paid
#[derive(Debug, Deserialize)]
pub struct MarkPaidInput {
    pub payment_reference: Option<String>,
}

/// Weekly sheet together with its attached records and live breakdown
#[derive(Debug, Serialize)]
pub struct WeeklySheetDetail {
    pub sheet: WeeklySheet,
    pub expenses: Vec<WeeklyExpense>,
    pub credits: Vec<CrewCredit>,
    pub payouts: Vec<WeeklyPayout>,
    pub calculations: WeeklyBreakdown,
}

impl WeeklySheetService {
    /// Create a new WeeklySheetService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a settlement week for a vessel.
    ///
    /// Rejected when the vessel already has an unfinalized sheet or the
    /// window overlaps an existing one.
    pub async fn create_sheet(&self, input: CreateWeeklySheetInput) -> AppResult<WeeklySheet> {
        validate_week_range(input.week_start, input.week_end).map_err(|msg| {
            AppError::Validation {
                field: "week_end".to_string(),
                message: msg.to_string(),
            }
        })?;

        let open_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM weekly_sheets WHERE vessel_id = $1 AND status IN ('DRAFT', 'READY_FOR_APPROVAL')",
        )
        .bind(input.vessel_id)
        .fetch_one(&self.db)
        .await?;

        if open_count > 0 {
            return Err(AppError::Conflict {
                resource: "weekly sheet".to_string(),
                message: "Vessel already has an open settlement week".to_string(),
            });
        }

        let overlap_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM weekly_sheets WHERE vessel_id = $1 AND week_start <= $3 AND week_end >= $2",
        )
        .bind(input.vessel_id)
        .bind(input.week_start)
        .bind(input.week_end)
        .fetch_one(&self.db)
        .await?;

        if overlap_count > 0 {
            return Err(AppError::Conflict {
                resource: "weekly sheet".to_string(),
                message: "Settlement window overlaps an existing sheet".to_string(),
            });
        }

        let row = sqlx::query_as::<_, WeeklySheetRow>(&format!(
            r#"
            INSERT INTO weekly_sheets (vessel_id, week_start, week_end, label, description,
                                       status, total_sales, total_expenses, total_weekly_payout,
                                       owner_share, crew_share)
            VALUES ($1, $2, $3, $4, $5, 'DRAFT', 0, 0, 0, 0, 0)
            RETURNING {SHEET_COLUMNS}
            "#
        ))
        .bind(input.vessel_id)
        .bind(input.week_start)
        .bind(input.week_end)
        .bind(&input.label)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a sheet with its expenses, credits, stored payouts and a live
    /// aggregation of its closed trips
    pub async fn get_sheet(&self, sheet_id: Uuid) -> AppResult<WeeklySheetDetail> {
        let sheet = self.fetch_sheet(sheet_id).await?;

        let expenses = self.list_expenses(sheet_id).await?;
        let credits = self.list_credits(sheet_id).await?;
        let payouts = self.list_payouts(sheet_id).await?;

        let calculations = SettlementService::new(self.db.clone())
            .calculate_week(sheet_id)
            .await?;

        Ok(WeeklySheetDetail {
            sheet,
            expenses,
            credits,
            payouts,
            calculations,
        })
    }

    /// List sheets, optionally restricted to one vessel
    pub async fn list_sheets(&self, vessel_id: Option<Uuid>) -> AppResult<Vec<WeeklySheet>> {
        let rows = sqlx::query_as::<_, WeeklySheetRow>(&format!(
            r#"
            SELECT {SHEET_COLUMNS}
            FROM weekly_sheets
            WHERE ($1::uuid IS NULL OR vessel_id = $1)
            ORDER BY week_start DESC
            "#
        ))
        .bind(vessel_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Attach week-level expenses; they only affect the settlement once
    /// approved
    pub async fn add_expenses(
        &self,
        sheet_id: Uuid,
        expenses: Vec<AddWeeklyExpenseInput>,
    ) -> AppResult<Vec<WeeklyExpense>> {
        let sheet = self.fetch_sheet(sheet_id).await?;
        self.ensure_editable(&sheet)?;

        for (i, e) in expenses.iter().enumerate() {
            validate_amount(e.amount).map_err(|msg| AppError::Validation {
                field: format!("expenses[{}].amount", i),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let mut created = Vec::with_capacity(expenses.len());
        for e in &expenses {
            let row = sqlx::query_as::<_, WeeklyExpenseRow>(
                r#"
                INSERT INTO weekly_expenses (weekly_sheet_id, category, amount, description, status)
                VALUES ($1, $2, $3, $4, 'PENDING')
                RETURNING id, weekly_sheet_id, category, amount, description, status, created_at
                "#,
            )
            .bind(sheet_id)
            .bind(&e.category)
            .bind(e.amount)
            .bind(&e.description)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Approve a pending weekly expense so it enters the per-trip
    /// allocation
    pub async fn approve_expense(
        &self,
        sheet_id: Uuid,
        expense_id: Uuid,
    ) -> AppResult<WeeklyExpense> {
        let sheet = self.fetch_sheet(sheet_id).await?;
        self.ensure_editable(&sheet)?;

        let row = sqlx::query_as::<_, WeeklyExpenseRow>(
            r#"
            UPDATE weekly_expenses
            SET status = 'APPROVED'
            WHERE id = $2 AND weekly_sheet_id = $1
            RETURNING id, weekly_sheet_id, category, amount, description, status, created_at
            "#,
        )
        .bind(sheet_id)
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Weekly expense".to_string()))?;

        Ok(row.into())
    }

    /// Record advances given to crew members during the week
    pub async fn add_credits(
        &self,
        sheet_id: Uuid,
        credits: Vec<AddCreditInput>,
    ) -> AppResult<Vec<CrewCredit>> {
        let sheet = self.fetch_sheet(sheet_id).await?;
        self.ensure_editable(&sheet)?;

        for (i, c) in credits.iter().enumerate() {
            validate_amount(c.amount).map_err(|msg| AppError::Validation {
                field: format!("credits[{}].amount", i),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let mut created = Vec::with_capacity(credits.len());
        for c in &credits {
            let row = sqlx::query_as::<_, CrewCreditRow>(
                r#"
                INSERT INTO crew_credits (weekly_sheet_id, crew_member_id, amount, description,
                                          credit_date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, weekly_sheet_id, crew_member_id, amount, description, credit_date,
                          created_at
                "#,
            )
            .bind(sheet_id)
            .bind(c.crew_member_id)
            .bind(c.amount)
            .bind(&c.description)
            .bind(c.credit_date)
            .fetch_one(&mut *tx)
            .await?;

            created.push(row.into());
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Preview the weekly aggregation without persisting anything
    pub async fn calculate(&self, sheet_id: Uuid) -> AppResult<WeeklyBreakdown> {
        self.fetch_sheet(sheet_id).await?;

        SettlementService::new(self.db.clone())
            .calculate_week(sheet_id)
            .await
    }

    /// Finalize the sheet: aggregate its closed trips, store the totals
    /// and upsert one payout record per crew member
    pub async fn finalize(&self, sheet_id: Uuid) -> AppResult<WeeklySheetDetail> {
        let sheet = self.fetch_sheet(sheet_id).await?;

        if !sheet.status.is_editable() {
            return Err(AppError::InvalidStateTransition(
                "Weekly sheet is already finalized".to_string(),
            ));
        }

        let settlement = SettlementService::new(self.db.clone());
        let breakdown = settlement.calculate_week(sheet_id).await?;

        let mut tx = self.db.begin().await?;
        settlement
            .apply_weekly_totals(&mut tx, sheet_id, &breakdown)
            .await?;
        settlement
            .upsert_weekly_payouts(&mut tx, sheet_id, &breakdown)
            .await?;
        sqlx::query(
            "UPDATE weekly_sheets SET status = 'FINALIZED', processed_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(sheet_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get_sheet(sheet_id).await
    }

    /// Reopen a finalized sheet: payout records are discarded and the
    /// stored totals reset
    pub async fn reopen(&self, sheet_id: Uuid) -> AppResult<WeeklySheet> {
        let sheet = self.fetch_sheet(sheet_id).await?;

        if sheet.status != WeeklySheetStatus::Finalized {
            return Err(AppError::InvalidStateTransition(
                "Only finalized sheets can be reopened".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM weekly_payouts WHERE weekly_sheet_id = $1")
            .bind(sheet_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            UPDATE weekly_sheets
            SET status = 'DRAFT',
                total_sales = 0,
                total_expenses = 0,
                total_weekly_payout = 0,
                owner_share = 0,
                crew_share = 0,
                processed_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(sheet_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.fetch_sheet(sheet_id).await
    }

    /// Mark a finalized sheet's payouts as paid
    pub async fn mark_paid(&self, sheet_id: Uuid, input: MarkPaidInput) -> AppResult<WeeklySheet> {
        let sheet = self.fetch_sheet(sheet_id).await?;

        if sheet.status != WeeklySheetStatus::Finalized {
            return Err(AppError::InvalidStateTransition(
                "Only finalized sheets can be marked paid".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"
            UPDATE weekly_payouts
            SET is_paid = TRUE,
                paid_at = NOW(),
                payment_reference = COALESCE($2, payment_reference),
                updated_at = NOW()
            WHERE weekly_sheet_id = $1
            "#,
        )
        .bind(sheet_id)
        .bind(&input.payment_reference)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE weekly_sheets SET status = 'PAID', updated_at = NOW() WHERE id = $1")
            .bind(sheet_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.fetch_sheet(sheet_id).await
    }

    async fn fetch_sheet(&self, sheet_id: Uuid) -> AppResult<WeeklySheet> {
        let row = sqlx::query_as::<_, WeeklySheetRow>(&format!(
            "SELECT {SHEET_COLUMNS} FROM weekly_sheets WHERE id = $1"
        ))
        .bind(sheet_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Weekly sheet".to_string()))?;

        Ok(row.into())
    }

    async fn list_expenses(&self, sheet_id: Uuid) -> AppResult<Vec<WeeklyExpense>> {
        let rows = sqlx::query_as::<_, WeeklyExpenseRow>(
            r#"
            SELECT id, weekly_sheet_id, category, amount, description, status, created_at
            FROM weekly_expenses
            WHERE weekly_sheet_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(sheet_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_credits(&self, sheet_id: Uuid) -> AppResult<Vec<CrewCredit>> {
        let rows = sqlx::query_as::<_, CrewCreditRow>(
            r#"
            SELECT id, weekly_sheet_id, crew_member_id, amount, description, credit_date,
                   created_at
            FROM crew_credits
            WHERE weekly_sheet_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(sheet_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_payouts(&self, sheet_id: Uuid) -> AppResult<Vec<WeeklyPayout>> {
        let rows = sqlx::query_as::<_, WeeklyPayoutRow>(
            r#"
            SELECT p.id, p.weekly_sheet_id, p.crew_member_id, p.base_amount, p.credit_deduction,
                   p.final_amount, p.is_paid, p.paid_at, p.payment_reference, p.created_at,
                   p.updated_at
            FROM weekly_payouts p
            JOIN crew_members c ON c.id = p.crew_member_id
            WHERE p.weekly_sheet_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(sheet_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    fn ensure_editable(&self, sheet: &WeeklySheet) -> AppResult<()> {
        if !sheet.status.is_editable() {
            return Err(AppError::InvalidStateTransition(
                "Finalized sheets cannot be modified; reopen the sheet first".to_string(),
            ));
        }
        Ok(())
    }
}
