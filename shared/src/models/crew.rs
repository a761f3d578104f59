//! Crew member models and role weighting

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A crew member employed across trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: Uuid,
    pub name: String,
    pub local_name: Option<String>,
    pub phone: Option<String>,
    pub id_card_no: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role a crew member holds on a trip, driving payout weight and
/// baseline kilo credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewRole {
    Baiting,
    Fishing,
    Chummer,
    Diving,
    Helper,
    Special,
}

impl CrewRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrewRole::Baiting => "BAITING",
            CrewRole::Fishing => "FISHING",
            CrewRole::Chummer => "CHUMMER",
            CrewRole::Diving => "DIVING",
            CrewRole::Helper => "HELPER",
            CrewRole::Special => "SPECIAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BAITING" => Some(CrewRole::Baiting),
            "FISHING" => Some(CrewRole::Fishing),
            "CHUMMER" => Some(CrewRole::Chummer),
            "DIVING" => Some(CrewRole::Diving),
            "HELPER" => Some(CrewRole::Helper),
            "SPECIAL" => Some(CrewRole::Special),
            _ => None,
        }
    }

    /// Payout weight units for one assignment of this role.
    ///
    /// The helper ratio only applies to SPECIAL assignments and defaults
    /// to 1.0 when absent.
    pub fn weight(&self, helper_ratio: Option<Decimal>) -> Decimal {
        let half = Decimal::new(5, 1);
        match self {
            CrewRole::Diving => Decimal::ONE,
            CrewRole::Special => half * helper_ratio.unwrap_or(Decimal::ONE),
            CrewRole::Baiting | CrewRole::Fishing | CrewRole::Chummer | CrewRole::Helper => half,
        }
    }

    /// Notional catch kilos credited to this role for valuation,
    /// independent of actual catch
    pub fn baseline_kilos(&self) -> Decimal {
        match self {
            CrewRole::Baiting | CrewRole::Fishing => Decimal::from(4),
            _ => Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for CrewRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
