//! Validation utilities for the Fishing Vessel Settlement Platform

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::CrewRole;

/// Validate a helper ratio for a SPECIAL assignment (expected 0.1-2.0)
pub fn validate_helper_ratio(ratio: Decimal) -> Result<(), &'static str> {
    if ratio < Decimal::new(1, 1) || ratio > Decimal::from(2) {
        return Err("Helper ratio must be between 0.1 and 2.0");
    }
    Ok(())
}

/// Validate a monetary amount entered by a user
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a weekly settlement window
pub fn validate_week_range(week_start: NaiveDate, week_end: NaiveDate) -> Result<(), &'static str> {
    if week_end <= week_start {
        return Err("Week end must be after week start");
    }
    Ok(())
}

/// Validate a purchase line: the stored amount must equal kilos x rate
pub fn validate_purchase_amount(
    kilos: Decimal,
    rate_per_kilo: Decimal,
    amount: Decimal,
) -> Result<(), &'static str> {
    if kilos < Decimal::ZERO || rate_per_kilo < Decimal::ZERO {
        return Err("Kilos and rate cannot be negative");
    }
    if amount != kilos * rate_per_kilo {
        return Err("Purchase amount must equal kilos times rate");
    }
    Ok(())
}

/// A helper ratio is only meaningful on SPECIAL assignments
pub fn validate_assignment_ratio(
    role: CrewRole,
    helper_ratio: Option<Decimal>,
) -> Result<(), &'static str> {
    match helper_ratio {
        Some(ratio) if role == CrewRole::Special => validate_helper_ratio(ratio),
        Some(_) => Err("Helper ratio only applies to SPECIAL assignments"),
        None => Ok(()),
    }
}
