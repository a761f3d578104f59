//! Tests for the weekly aggregator: expense allocation across trips,
//! member aggregation, credit deduction and payout ordering

use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    calculate_week, AssignmentEntry, BillEntry, BillType, CreditEntry, CrewRole,
    TripSettlementInput, WeeklyExpenseEntry, WeeklyExpenseStatus, WeeklySettlementInput,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn member(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// A trip with one TODAY_SALES bill and one DIVING member; the member
/// receives the whole crew share (0.6 x bill amount)
fn diving_trip(bill: &str, id: Uuid, name: &str) -> TripSettlementInput {
    TripSettlementInput {
        bills: vec![BillEntry {
            bill_type: BillType::TodaySales,
            amount: dec(bill),
        }],
        assignments: vec![AssignmentEntry {
            crew_member_id: id,
            crew_member_name: name.to_string(),
            role: CrewRole::Diving,
            helper_ratio: None,
        }],
        ..Default::default()
    }
}

fn approved_expense(amount: &str) -> WeeklyExpenseEntry {
    WeeklyExpenseEntry {
        status: WeeklyExpenseStatus::Approved,
        amount: dec(amount),
    }
}

// =============================================================================
// Member aggregation and credits
// =============================================================================

mod payout_aggregation {
    use super::*;

    #[test]
    fn member_totals_accumulate_across_trips_and_credits_deduct() {
        // Two 500-sale trips: crew share 300 each, all to Ahmed
        let ahmed = member(1);
        let input = WeeklySettlementInput {
            credits: vec![CreditEntry {
                crew_member_id: ahmed,
                amount: dec("30"),
            }],
            trips: vec![
                diving_trip("500", ahmed, "Ahmed"),
                diving_trip("500", ahmed, "Ahmed"),
            ],
            ..Default::default()
        };

        let result = calculate_week(&input);

        assert_eq!(result.summary.fishing_days, 2);
        assert_eq!(result.payouts.len(), 1);
        let payout = &result.payouts[0];
        assert_eq!(payout.base_amount, dec("600.00"));
        assert_eq!(payout.credit_deduction, dec("30.00"));
        assert_eq!(payout.final_amount, dec("570.00"));
        assert_eq!(payout.trips_count, 2);
    }

    #[test]
    fn credits_clamp_final_amount_at_zero() {
        let ahmed = member(1);
        let input = WeeklySettlementInput {
            credits: vec![CreditEntry {
                crew_member_id: ahmed,
                amount: dec("1000"),
            }],
            trips: vec![diving_trip("500", ahmed, "Ahmed")],
            ..Default::default()
        };

        let result = calculate_week(&input);

        assert_eq!(result.payouts[0].base_amount, dec("300.00"));
        assert_eq!(result.payouts[0].credit_deduction, dec("1000.00"));
        assert_eq!(result.payouts[0].final_amount, dec("0.00"));
    }

    #[test]
    fn multiple_credits_for_one_member_are_summed() {
        let ahmed = member(1);
        let input = WeeklySettlementInput {
            credits: vec![
                CreditEntry {
                    crew_member_id: ahmed,
                    amount: dec("20"),
                },
                CreditEntry {
                    crew_member_id: ahmed,
                    amount: dec("15"),
                },
                // Credit for someone who never sailed this week
                CreditEntry {
                    crew_member_id: member(9),
                    amount: dec("50"),
                },
            ],
            trips: vec![diving_trip("500", ahmed, "Ahmed")],
            ..Default::default()
        };

        let result = calculate_week(&input);

        // Only members appearing on trips get payout records
        assert_eq!(result.payouts.len(), 1);
        assert_eq!(result.payouts[0].credit_deduction, dec("35.00"));
        assert_eq!(result.payouts[0].final_amount, dec("265.00"));
    }

    #[test]
    fn payouts_sorted_by_member_name_regardless_of_trip_order() {
        let input = WeeklySettlementInput {
            trips: vec![
                diving_trip("500", member(1), "Zuhair"),
                diving_trip("500", member(2), "Moosa"),
                diving_trip("500", member(3), "Ahmed"),
            ],
            ..Default::default()
        };

        let result = calculate_week(&input);

        let names: Vec<&str> = result
            .payouts
            .iter()
            .map(|p| p.crew_member_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ahmed", "Moosa", "Zuhair"]);
    }
}

// =============================================================================
// Weekly expense allocation
// =============================================================================

mod expense_allocation {
    use super::*;

    #[test]
    fn approved_weekly_expenses_split_evenly_across_trips() {
        let input = WeeklySettlementInput {
            weekly_expenses: vec![
                approved_expense("40"),
                approved_expense("20"),
                WeeklyExpenseEntry {
                    status: WeeklyExpenseStatus::Pending,
                    amount: dec("999"),
                },
            ],
            trips: vec![
                diving_trip("500", member(1), "Ahmed"),
                diving_trip("500", member(2), "Ibrahim"),
            ],
            ..Default::default()
        };

        let result = calculate_week(&input);

        // 60 approved across 2 trips -> 30 each
        assert_eq!(result.summary.weekly_expense_total, dec("60.00"));
        assert_eq!(result.summary.weekly_expense_per_day, dec("30.00"));
        assert_eq!(result.expenses.weekly_share, dec("60.00"));
        assert_eq!(result.expenses.total, dec("60.00"));
        // Each trip: balance 470, net 423, crew 282
        assert_eq!(result.distribution.balance, dec("940.00"));
        assert_eq!(result.distribution.crew_share, dec("564.00"));
    }

    #[test]
    fn zero_trip_week_reports_share_but_applies_nothing() {
        let input = WeeklySettlementInput {
            weekly_expenses: vec![approved_expense("70")],
            ..Default::default()
        };

        let result = calculate_week(&input);

        assert_eq!(result.summary.fishing_days, 0);
        assert_eq!(result.summary.weekly_expense_total, dec("70.00"));
        // Divisor floors at one: the full amount shows as the per-day share
        assert_eq!(result.summary.weekly_expense_per_day, dec("70.00"));
        // With no trips nothing is summed or distributed
        assert_eq!(result.expenses.weekly_share, dec("0.00"));
        assert_eq!(result.revenue.total_sales, dec("0.00"));
        assert_eq!(result.distribution.crew_share, dec("0.00"));
        assert!(result.payouts.is_empty());
    }
}

// =============================================================================
// Weekly revenue and distribution sums
// =============================================================================

mod weekly_sums {
    use super::*;

    #[test]
    fn revenue_and_distribution_sum_rounded_trip_values() {
        let input = WeeklySettlementInput {
            trips: vec![
                diving_trip("100.10", member(1), "Ahmed"),
                diving_trip("200.20", member(2), "Ibrahim"),
            ],
            ..Default::default()
        };

        let result = calculate_week(&input);

        assert_eq!(result.revenue.today_sales, dec("300.30"));
        assert_eq!(result.revenue.total_sales, dec("300.30"));
        // Trip nets: 90.09 and 180.18
        assert_eq!(result.distribution.net_total, dec("270.27"));
        assert_eq!(result.distribution.owner_share, dec("90.09"));
        assert_eq!(result.distribution.crew_share, dec("180.18"));
    }

    #[test]
    fn one_member_across_trips_with_another_on_one() {
        let ahmed = member(1);
        let input = WeeklySettlementInput {
            trips: vec![
                diving_trip("500", ahmed, "Ahmed"),
                diving_trip("300", member(2), "Ibrahim"),
                diving_trip("500", ahmed, "Ahmed"),
            ],
            ..Default::default()
        };

        let result = calculate_week(&input);

        assert_eq!(result.payouts.len(), 2);
        let ahmed_payout = &result.payouts[0];
        assert_eq!(ahmed_payout.crew_member_name, "Ahmed");
        assert_eq!(ahmed_payout.base_amount, dec("600.00"));
        assert_eq!(ahmed_payout.trips_count, 2);
        let ibrahim_payout = &result.payouts[1];
        assert_eq!(ibrahim_payout.base_amount, dec("180.00"));
        assert_eq!(ibrahim_payout.trips_count, 1);
    }
}
