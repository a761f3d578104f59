//! Fish types and per-kilo rate resolution

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the fish type whose rate values crew baseline kilos
pub const PROPER_FISH_NAME: &str = "Proper Fish";

/// Fallback per-kilo rate when the proper fish type does not exist
pub fn proper_fish_fallback_rate() -> Decimal {
    Decimal::from(16)
}

/// A named fish type with a default per-kilo rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishType {
    pub id: Uuid,
    pub name: String,
    pub default_rate_per_kilo: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dated rate record for a fish type.
///
/// An open `rate_effective_from`/`rate_effective_to` end means the window
/// is unbounded on that side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishTypeRate {
    pub id: Uuid,
    pub fish_type_id: Uuid,
    pub rate_per_kilo: Decimal,
    pub rate_effective_from: Option<NaiveDate>,
    pub rate_effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl FishTypeRate {
    /// Whether this rate applies on the given date
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        let from_ok = self.rate_effective_from.map_or(true, |from| from <= date);
        let to_ok = self.rate_effective_to.map_or(true, |to| to >= date);
        from_ok && to_ok
    }
}

/// Resolve the effective per-kilo rate for a fish type on a date.
///
/// Among active rates whose window contains the date, the one with the
/// latest `rate_effective_from` wins; rates without a start date sort
/// last. Falls back to the type's stored default rate when nothing
/// matches.
pub fn effective_rate(default_rate: Decimal, rates: &[FishTypeRate], date: NaiveDate) -> Decimal {
    rates
        .iter()
        .filter(|r| r.is_effective_on(date))
        .max_by_key(|r| r.rate_effective_from)
        .map(|r| r.rate_per_kilo)
        .unwrap_or(default_rate)
}
