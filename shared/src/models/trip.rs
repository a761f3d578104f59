//! Trip models: bills, purchases, expenses and crew assignments

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crew::CrewRole;

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Draft,
    Ongoing,
    Closed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "DRAFT",
            TripStatus::Ongoing => "ONGOING",
            TripStatus::Closed => "CLOSED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(TripStatus::Draft),
            "ONGOING" => Some(TripStatus::Ongoing),
            "CLOSED" => Some(TripStatus::Closed),
            _ => None,
        }
    }

    /// Draft and ongoing trips may still be edited
    pub fn is_editable(&self) -> bool {
        matches!(self, TripStatus::Draft | TripStatus::Ongoing)
    }
}

/// One vessel's single-day fishing/sales/expense record.
///
/// The money fields are outputs written back by the settlement engine,
/// never inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub vessel_id: Uuid,
    pub weekly_sheet_id: Option<Uuid>,
    pub date: NaiveDate,
    pub day_of_week: Option<String>,
    pub is_fishing_day: bool,
    pub status: TripStatus,
    pub total_sales: Decimal,
    pub balance: Decimal,
    pub net_total: Decimal,
    pub owner_share: Decimal,
    pub crew_share: Decimal,
    pub notes: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bill classification; only today's and the previous day's sales bills
/// count as trip revenue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillType {
    TodaySales,
    PreviousDaySales,
    Other,
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::TodaySales => "TODAY_SALES",
            BillType::PreviousDaySales => "PREVIOUS_DAY_SALES",
            BillType::Other => "OTHER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TODAY_SALES" => Some(BillType::TodaySales),
            "PREVIOUS_DAY_SALES" => Some(BillType::PreviousDaySales),
            "OTHER" => Some(BillType::Other),
            _ => None,
        }
    }
}

/// A fish sale bill recorded against a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub bill_type: BillType,
    pub bill_no: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub bill_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A fish purchase made during a trip; amount = kilos x rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishPurchase {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub fish_type_id: Uuid,
    pub kilos: Decimal,
    pub rate_per_kilo: Decimal,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Expense approval status; only approved expenses reduce trip balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "PENDING",
            ExpenseStatus::Approved => "APPROVED",
            ExpenseStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(ExpenseStatus::Pending),
            "APPROVED" => Some(ExpenseStatus::Approved),
            "REJECTED" => Some(ExpenseStatus::Rejected),
            _ => None,
        }
    }
}

/// A trip-level expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub expense_type: Option<String>,
    pub status: ExpenseStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A crew member's role on a specific trip.
///
/// Unique per (trip, member, role); one member may hold several distinct
/// roles on the same trip, each contributing weight and baseline kilos
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripAssignment {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub crew_member_id: Uuid,
    pub role: CrewRole,
    pub helper_ratio: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}
