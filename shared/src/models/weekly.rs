//! Weekly settlement sheet models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekly sheet lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeeklySheetStatus {
    Draft,
    ReadyForApproval,
    Finalized,
    Paid,
}

impl WeeklySheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeeklySheetStatus::Draft => "DRAFT",
            WeeklySheetStatus::ReadyForApproval => "READY_FOR_APPROVAL",
            WeeklySheetStatus::Finalized => "FINALIZED",
            WeeklySheetStatus::Paid => "PAID",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(WeeklySheetStatus::Draft),
            "READY_FOR_APPROVAL" => Some(WeeklySheetStatus::ReadyForApproval),
            "FINALIZED" => Some(WeeklySheetStatus::Finalized),
            "PAID" => Some(WeeklySheetStatus::Paid),
            _ => None,
        }
    }

    /// Expenses and credits may only be attached before finalization
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            WeeklySheetStatus::Draft | WeeklySheetStatus::ReadyForApproval
        )
    }
}

/// A settlement window aggregating one vessel's trips for a week.
///
/// The totals are outputs written back on finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySheet {
    pub id: Uuid,
    pub vessel_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub label: Option<String>,
    pub description: Option<String>,
    pub status: WeeklySheetStatus,
    pub total_sales: Decimal,
    pub total_expenses: Decimal,
    pub total_weekly_payout: Decimal,
    pub owner_share: Decimal,
    pub crew_share: Decimal,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Weekly expense approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeeklyExpenseStatus {
    Pending,
    Approved,
}

impl WeeklyExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeeklyExpenseStatus::Pending => "PENDING",
            WeeklyExpenseStatus::Approved => "APPROVED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(WeeklyExpenseStatus::Pending),
            "APPROVED" => Some(WeeklyExpenseStatus::Approved),
            _ => None,
        }
    }
}

/// A week-level expense distributed evenly across the week's trips once
/// approved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyExpense {
    pub id: Uuid,
    pub weekly_sheet_id: Uuid,
    pub category: Option<String>,
    pub amount: Decimal,
    pub description: Option<String>,
    pub status: WeeklyExpenseStatus,
    pub created_at: DateTime<Utc>,
}

/// An advance to a crew member during the week, deducted from their
/// final payout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewCredit {
    pub id: Uuid,
    pub weekly_sheet_id: Uuid,
    pub crew_member_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub credit_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Final payout record per (sheet, member); upserted on finalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPayout {
    pub id: Uuid,
    pub weekly_sheet_id: Uuid,
    pub crew_member_id: Uuid,
    pub base_amount: Decimal,
    pub credit_deduction: Decimal,
    pub final_amount: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
