//! The settlement engine: trip financial breakdown and weekly payout
//! aggregation.
//!
//! Both calculators are pure functions over already-loaded records. The
//! backend services load the rows, resolve the proper-fish rate, invoke
//! these functions and persist the outputs.
//!
//! Rounding contract: every output leaf is independently rounded to two
//! decimal places, while unrounded values are carried between steps
//! within a trip. The weekly level sums the already-rounded per-trip
//! values. This double rounding matches the historically computed
//! records and must not be "fixed" by rounding once at the end.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crew::CrewRole;
use super::trip::{BillType, ExpenseStatus};
use super::weekly::WeeklyExpenseStatus;

/// Round a monetary value to two decimal places, midpoint away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ============================================================================
// Engine inputs
// ============================================================================

/// A bill as seen by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillEntry {
    pub bill_type: BillType,
    pub amount: Decimal,
}

/// A trip expense as seen by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub status: ExpenseStatus,
    pub amount: Decimal,
}

/// A crew assignment as seen by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub crew_member_id: Uuid,
    pub crew_member_name: String,
    pub role: CrewRole,
    pub helper_ratio: Option<Decimal>,
}

/// Everything the trip calculator needs for one trip
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripSettlementInput {
    pub bills: Vec<BillEntry>,
    pub purchase_amounts: Vec<Decimal>,
    pub expenses: Vec<ExpenseEntry>,
    pub assignments: Vec<AssignmentEntry>,
    /// Effective per-kilo rate of the proper fish type on the trip date
    pub proper_fish_rate: Decimal,
}

/// A week-level expense as seen by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyExpenseEntry {
    pub status: WeeklyExpenseStatus,
    pub amount: Decimal,
}

/// An advance to a crew member as seen by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEntry {
    pub crew_member_id: Uuid,
    pub amount: Decimal,
}

/// Everything the weekly aggregator needs for one sheet: the sheet's
/// expenses and credits plus one trip input per closed trip in the week
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySettlementInput {
    pub weekly_expenses: Vec<WeeklyExpenseEntry>,
    pub credits: Vec<CreditEntry>,
    pub trips: Vec<TripSettlementInput>,
}

// ============================================================================
// Engine outputs
// ============================================================================

/// Full financial breakdown of one trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripBreakdown {
    pub revenue: RevenueBreakdown,
    pub expenses: ExpenseBreakdown,
    pub distribution: DistributionBreakdown,
    pub crew: CrewBreakdown,
}

/// Revenue composition of a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub today_sales: Decimal,
    pub previous_day_sales: Decimal,
    pub bill_total: Decimal,
    pub purchase_total: Decimal,
    pub crew_kilos: Decimal,
    pub crew_kilos_value: Decimal,
    pub total_sales: Decimal,
}

/// Expense composition of a trip; pending is reported but never
/// subtracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub approved: Decimal,
    pub pending: Decimal,
    pub weekly_share: Decimal,
    pub total: Decimal,
}

/// Owner/crew distribution of a trip or a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionBreakdown {
    pub balance: Decimal,
    pub vessel_maintenance: Decimal,
    pub net_total: Decimal,
    pub owner_share: Decimal,
    pub crew_share: Decimal,
}

/// Crew payout split for one trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewBreakdown {
    pub total_weight_units: Decimal,
    pub per_unit_value: Decimal,
    pub member_payouts: Vec<MemberPayout>,
}

/// One crew member's payout on one trip, listed in first-appearance
/// order of the assignments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPayout {
    pub crew_member_id: Uuid,
    pub crew_member_name: String,
    pub total_weight: Decimal,
    pub roles: Vec<RoleContribution>,
    pub total_amount: Decimal,
}

/// One role's weight contribution within a member's payout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleContribution {
    pub role: CrewRole,
    pub weight: Decimal,
}

/// Aggregated weekly breakdown with final per-member payouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyBreakdown {
    pub summary: WeeklySummary,
    pub revenue: WeeklyRevenue,
    pub expenses: WeeklyExpenses,
    pub distribution: DistributionBreakdown,
    pub payouts: Vec<WeeklyMemberPayout>,
}

/// Week-level headline numbers.
///
/// `fishing_days` is the true count of closed trips; the expense divisor
/// is separately floored at one, so a week with zero trips still reports
/// the full weekly amount as the per-day share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub fishing_days: u32,
    pub weekly_expense_total: Decimal,
    pub weekly_expense_per_day: Decimal,
}

/// Revenue fields summed across the week's trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRevenue {
    pub today_sales: Decimal,
    pub previous_day_sales: Decimal,
    pub bill_total: Decimal,
    pub purchase_total: Decimal,
    pub crew_kilos_value: Decimal,
    pub total_sales: Decimal,
}

/// Expense fields summed across the week's trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyExpenses {
    pub approved: Decimal,
    pub weekly_share: Decimal,
    pub total: Decimal,
}

/// One crew member's final weekly payout, net of credits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyMemberPayout {
    pub crew_member_id: Uuid,
    pub crew_member_name: String,
    pub base_amount: Decimal,
    pub credit_deduction: Decimal,
    pub final_amount: Decimal,
    pub trips_count: u32,
}

// ============================================================================
// Trip calculator
// ============================================================================

/// Calculate the full financial breakdown for one trip.
///
/// `weekly_expense_share` is this trip's allocated portion of the week's
/// approved expenses; pass zero when settling the trip on its own. The
/// calculation never fails: a trip with no bills, purchases or
/// assignments yields an all-zero breakdown.
pub fn calculate_trip(input: &TripSettlementInput, weekly_expense_share: Decimal) -> TripBreakdown {
    let today_sales: Decimal = input
        .bills
        .iter()
        .filter(|b| b.bill_type == BillType::TodaySales)
        .map(|b| b.amount)
        .sum();

    let previous_sales: Decimal = input
        .bills
        .iter()
        .filter(|b| b.bill_type == BillType::PreviousDaySales)
        .map(|b| b.amount)
        .sum();

    let bill_total = today_sales + previous_sales;

    let purchase_total: Decimal = input.purchase_amounts.iter().copied().sum();

    let crew_kilos: Decimal = input
        .assignments
        .iter()
        .map(|a| a.role.baseline_kilos())
        .sum();
    let crew_kilos_value = crew_kilos * input.proper_fish_rate;

    let total_sales = bill_total + purchase_total + crew_kilos_value;

    let approved_expenses: Decimal = input
        .expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Approved)
        .map(|e| e.amount)
        .sum();

    let pending_expenses: Decimal = input
        .expenses
        .iter()
        .filter(|e| e.status == ExpenseStatus::Pending)
        .map(|e| e.amount)
        .sum();

    let total_expenses = approved_expenses + weekly_expense_share;

    let balance = total_sales - total_expenses;

    // 10% of balance goes to vessel maintenance, signed (a losing trip
    // carries a negative maintenance figure rather than flooring at zero)
    let vessel_maintenance = balance * Decimal::new(10, 2);
    let net_total = balance - vessel_maintenance;

    let owner_share = net_total / Decimal::from(3);
    let crew_share = net_total * Decimal::from(2) / Decimal::from(3);

    let crew = calculate_crew_payouts(&input.assignments, crew_share);

    TripBreakdown {
        revenue: RevenueBreakdown {
            today_sales: round2(today_sales),
            previous_day_sales: round2(previous_sales),
            bill_total: round2(bill_total),
            purchase_total: round2(purchase_total),
            crew_kilos: round2(crew_kilos),
            crew_kilos_value: round2(crew_kilos_value),
            total_sales: round2(total_sales),
        },
        expenses: ExpenseBreakdown {
            approved: round2(approved_expenses),
            pending: round2(pending_expenses),
            weekly_share: round2(weekly_expense_share),
            total: round2(total_expenses),
        },
        distribution: DistributionBreakdown {
            balance: round2(balance),
            vessel_maintenance: round2(vessel_maintenance),
            net_total: round2(net_total),
            owner_share: round2(owner_share),
            crew_share: round2(crew_share),
        },
        crew,
    }
}

/// Split the (unrounded) crew share across members by role weight
fn calculate_crew_payouts(assignments: &[AssignmentEntry], crew_share: Decimal) -> CrewBreakdown {
    struct MemberAccumulator {
        crew_member_id: Uuid,
        crew_member_name: String,
        total_weight: Decimal,
        roles: Vec<RoleContribution>,
    }

    let mut total_weight_units = Decimal::ZERO;
    let mut order: Vec<MemberAccumulator> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for assignment in assignments {
        let weight = assignment.role.weight(assignment.helper_ratio);

        let slot = *index.entry(assignment.crew_member_id).or_insert_with(|| {
            order.push(MemberAccumulator {
                crew_member_id: assignment.crew_member_id,
                crew_member_name: assignment.crew_member_name.clone(),
                total_weight: Decimal::ZERO,
                roles: Vec::new(),
            });
            order.len() - 1
        });

        order[slot].total_weight += weight;
        order[slot].roles.push(RoleContribution {
            role: assignment.role,
            weight,
        });

        total_weight_units += weight;
    }

    // Guard against division by zero: no weight units means no crew
    // payouts beyond zero amounts
    let per_unit_value = if total_weight_units > Decimal::ZERO {
        crew_share / total_weight_units
    } else {
        Decimal::ZERO
    };

    let member_payouts = order
        .into_iter()
        .map(|acc| MemberPayout {
            crew_member_id: acc.crew_member_id,
            crew_member_name: acc.crew_member_name,
            total_weight: round2(acc.total_weight),
            roles: acc.roles,
            total_amount: round2(acc.total_weight * per_unit_value),
        })
        .collect();

    CrewBreakdown {
        total_weight_units: round2(total_weight_units),
        per_unit_value: round2(per_unit_value),
        member_payouts,
    }
}

// ============================================================================
// Weekly aggregator
// ============================================================================

/// Aggregate a week of closed trips into sheet totals and final
/// per-member payouts net of credits.
///
/// Invokes the trip calculator once per trip with the even per-trip
/// share of approved weekly expenses injected, sums the already-rounded
/// trip outputs, then deducts each member's credits, clamping final
/// amounts at zero. Payouts are sorted by member name ascending.
pub fn calculate_week(input: &WeeklySettlementInput) -> WeeklyBreakdown {
    struct WeeklyMemberAccumulator {
        crew_member_name: String,
        total_amount: Decimal,
        trips_count: u32,
    }

    let weekly_expense_amount: Decimal = input
        .weekly_expenses
        .iter()
        .filter(|e| e.status == WeeklyExpenseStatus::Approved)
        .map(|e| e.amount)
        .sum();

    let fishing_days = input.trips.len() as u32;
    // Divisor floors at one; with zero trips the full weekly amount is
    // reported as the per-day share but never applied to anything
    let divisor = fishing_days.max(1);
    let weekly_expense_share = weekly_expense_amount / Decimal::from(divisor);

    let mut revenue = WeeklyRevenue {
        today_sales: Decimal::ZERO,
        previous_day_sales: Decimal::ZERO,
        bill_total: Decimal::ZERO,
        purchase_total: Decimal::ZERO,
        crew_kilos_value: Decimal::ZERO,
        total_sales: Decimal::ZERO,
    };
    let mut expenses = WeeklyExpenses {
        approved: Decimal::ZERO,
        weekly_share: Decimal::ZERO,
        total: Decimal::ZERO,
    };
    let mut distribution = DistributionBreakdown {
        balance: Decimal::ZERO,
        vessel_maintenance: Decimal::ZERO,
        net_total: Decimal::ZERO,
        owner_share: Decimal::ZERO,
        crew_share: Decimal::ZERO,
    };

    let mut member_aggregates: HashMap<Uuid, WeeklyMemberAccumulator> = HashMap::new();

    for trip in &input.trips {
        let trip_calc = calculate_trip(trip, weekly_expense_share);

        revenue.today_sales += trip_calc.revenue.today_sales;
        revenue.previous_day_sales += trip_calc.revenue.previous_day_sales;
        revenue.bill_total += trip_calc.revenue.bill_total;
        revenue.purchase_total += trip_calc.revenue.purchase_total;
        revenue.crew_kilos_value += trip_calc.revenue.crew_kilos_value;
        revenue.total_sales += trip_calc.revenue.total_sales;

        expenses.approved += trip_calc.expenses.approved;
        expenses.weekly_share += trip_calc.expenses.weekly_share;
        expenses.total += trip_calc.expenses.total;

        distribution.balance += trip_calc.distribution.balance;
        distribution.vessel_maintenance += trip_calc.distribution.vessel_maintenance;
        distribution.net_total += trip_calc.distribution.net_total;
        distribution.owner_share += trip_calc.distribution.owner_share;
        distribution.crew_share += trip_calc.distribution.crew_share;

        for payout in &trip_calc.crew.member_payouts {
            let entry = member_aggregates
                .entry(payout.crew_member_id)
                .or_insert_with(|| WeeklyMemberAccumulator {
                    crew_member_name: payout.crew_member_name.clone(),
                    total_amount: Decimal::ZERO,
                    trips_count: 0,
                });
            entry.total_amount += payout.total_amount;
            entry.trips_count += 1;
        }
    }

    let mut payouts: Vec<WeeklyMemberPayout> = member_aggregates
        .into_iter()
        .map(|(crew_member_id, acc)| {
            let credit_deduction: Decimal = input
                .credits
                .iter()
                .filter(|c| c.crew_member_id == crew_member_id)
                .map(|c| c.amount)
                .sum();

            let final_amount = (acc.total_amount - credit_deduction).max(Decimal::ZERO);

            WeeklyMemberPayout {
                crew_member_id,
                crew_member_name: acc.crew_member_name,
                base_amount: round2(acc.total_amount),
                credit_deduction: round2(credit_deduction),
                final_amount: round2(final_amount),
                trips_count: acc.trips_count,
            }
        })
        .collect();

    payouts.sort_by(|a, b| a.crew_member_name.cmp(&b.crew_member_name));

    WeeklyBreakdown {
        summary: WeeklySummary {
            fishing_days,
            weekly_expense_total: round2(weekly_expense_amount),
            weekly_expense_per_day: round2(weekly_expense_share),
        },
        revenue: WeeklyRevenue {
            today_sales: round2(revenue.today_sales),
            previous_day_sales: round2(revenue.previous_day_sales),
            bill_total: round2(revenue.bill_total),
            purchase_total: round2(revenue.purchase_total),
            crew_kilos_value: round2(revenue.crew_kilos_value),
            total_sales: round2(revenue.total_sales),
        },
        expenses: WeeklyExpenses {
            approved: round2(expenses.approved),
            weekly_share: round2(expenses.weekly_share),
            total: round2(expenses.total),
        },
        distribution: DistributionBreakdown {
            balance: round2(distribution.balance),
            vessel_maintenance: round2(distribution.vessel_maintenance),
            net_total: round2(distribution.net_total),
            owner_share: round2(distribution.owner_share),
            crew_share: round2(distribution.crew_share),
        },
        payouts,
    }
}
