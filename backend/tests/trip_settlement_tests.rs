//! Tests for the trip settlement calculator: revenue composition,
//! expense handling, the 10% / one-third / two-thirds distribution and
//! weighted crew payouts

use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    calculate_trip, AssignmentEntry, BillEntry, BillType, CrewRole, ExpenseEntry, ExpenseStatus,
    TripSettlementInput,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn member(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn assignment(id: Uuid, name: &str, role: CrewRole) -> AssignmentEntry {
    AssignmentEntry {
        crew_member_id: id,
        crew_member_name: name.to_string(),
        role,
        helper_ratio: None,
    }
}

// =============================================================================
// Revenue and distribution
// =============================================================================

mod distribution {
    use super::*;

    #[test]
    fn basic_trip_flows_through_all_stages() {
        // 500 sales, 50 approved expenses:
        // balance 450, maintenance 45, net 405, owner 135, crew 270
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            expenses: vec![ExpenseEntry {
                status: ExpenseStatus::Approved,
                amount: dec("50"),
            }],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.revenue.today_sales, dec("500.00"));
        assert_eq!(result.revenue.total_sales, dec("500.00"));
        assert_eq!(result.expenses.approved, dec("50.00"));
        assert_eq!(result.expenses.total, dec("50.00"));
        assert_eq!(result.distribution.balance, dec("450.00"));
        assert_eq!(result.distribution.vessel_maintenance, dec("45.00"));
        assert_eq!(result.distribution.net_total, dec("405.00"));
        assert_eq!(result.distribution.owner_share, dec("135.00"));
        assert_eq!(result.distribution.crew_share, dec("270.00"));
    }

    #[test]
    fn bill_types_are_split_and_summed() {
        let input = TripSettlementInput {
            bills: vec![
                BillEntry {
                    bill_type: BillType::TodaySales,
                    amount: dec("300"),
                },
                BillEntry {
                    bill_type: BillType::PreviousDaySales,
                    amount: dec("120"),
                },
                // OTHER bills never count as revenue
                BillEntry {
                    bill_type: BillType::Other,
                    amount: dec("999"),
                },
            ],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.revenue.today_sales, dec("300.00"));
        assert_eq!(result.revenue.previous_day_sales, dec("120.00"));
        assert_eq!(result.revenue.bill_total, dec("420.00"));
        assert_eq!(result.revenue.total_sales, dec("420.00"));
    }

    #[test]
    fn purchases_add_to_revenue() {
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("100"),
            }],
            purchase_amounts: vec![dec("40.50"), dec("9.50")],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.revenue.purchase_total, dec("50.00"));
        assert_eq!(result.revenue.total_sales, dec("150.00"));
    }

    #[test]
    fn zero_input_yields_all_zero_breakdown() {
        let result = calculate_trip(&TripSettlementInput::default(), Decimal::ZERO);

        assert_eq!(result.revenue.total_sales, dec("0.00"));
        assert_eq!(result.expenses.total, dec("0.00"));
        assert_eq!(result.distribution.balance, dec("0.00"));
        assert_eq!(result.distribution.owner_share, dec("0.00"));
        assert_eq!(result.distribution.crew_share, dec("0.00"));
        assert_eq!(result.crew.total_weight_units, dec("0.00"));
        assert_eq!(result.crew.per_unit_value, dec("0.00"));
        assert!(result.crew.member_payouts.is_empty());
    }

    #[test]
    fn pending_expenses_reported_but_not_subtracted() {
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("200"),
            }],
            expenses: vec![
                ExpenseEntry {
                    status: ExpenseStatus::Pending,
                    amount: dec("70"),
                },
                ExpenseEntry {
                    status: ExpenseStatus::Rejected,
                    amount: dec("30"),
                },
            ],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.expenses.pending, dec("70.00"));
        assert_eq!(result.expenses.approved, dec("0.00"));
        assert_eq!(result.expenses.total, dec("0.00"));
        assert_eq!(result.distribution.balance, dec("200.00"));
    }

    #[test]
    fn negative_balance_carries_signed_maintenance() {
        // Expenses exceed revenue: maintenance is negative, not floored
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("100"),
            }],
            expenses: vec![ExpenseEntry {
                status: ExpenseStatus::Approved,
                amount: dec("200"),
            }],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.distribution.balance, dec("-100.00"));
        assert_eq!(result.distribution.vessel_maintenance, dec("-10.00"));
        assert_eq!(result.distribution.net_total, dec("-90.00"));
        assert_eq!(result.distribution.owner_share, dec("-30.00"));
        assert_eq!(result.distribution.crew_share, dec("-60.00"));
    }

    #[test]
    fn weekly_share_enters_trip_expenses() {
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            ..Default::default()
        };

        let result = calculate_trip(&input, dec("50"));

        assert_eq!(result.expenses.weekly_share, dec("50.00"));
        assert_eq!(result.expenses.total, dec("50.00"));
        assert_eq!(result.distribution.balance, dec("450.00"));
    }
}

// =============================================================================
// Crew baseline kilos
// =============================================================================

mod baseline_kilos {
    use super::*;

    #[test]
    fn baiting_and_fishing_credit_four_kilos_each() {
        let input = TripSettlementInput {
            assignments: vec![
                assignment(member(1), "Ahmed", CrewRole::Baiting),
                assignment(member(2), "Ibrahim", CrewRole::Fishing),
                assignment(member(3), "Hassan", CrewRole::Diving),
                assignment(member(4), "Ali", CrewRole::Helper),
            ],
            proper_fish_rate: dec("16"),
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        // 4 + 4 kilos valued at the proper fish rate
        assert_eq!(result.revenue.crew_kilos, dec("8.00"));
        assert_eq!(result.revenue.crew_kilos_value, dec("128.00"));
        assert_eq!(result.revenue.total_sales, dec("128.00"));
    }

    #[test]
    fn no_baseline_roles_means_no_kilo_value() {
        let input = TripSettlementInput {
            assignments: vec![
                assignment(member(1), "Ahmed", CrewRole::Diving),
                assignment(member(2), "Ibrahim", CrewRole::Chummer),
            ],
            proper_fish_rate: dec("16"),
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.revenue.crew_kilos, dec("0.00"));
        assert_eq!(result.revenue.crew_kilos_value, dec("0.00"));
    }
}

// =============================================================================
// Crew payout split
// =============================================================================

mod crew_payouts {
    use super::*;

    #[test]
    fn weights_split_the_crew_share() {
        // Proper fish rate zero keeps revenue clean:
        // 500 sales, no expenses -> crew share 300
        // BAITING 0.5 + DIVING 1.0 = 1.5 units, per unit 200
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            assignments: vec![
                assignment(member(1), "Ahmed", CrewRole::Baiting),
                assignment(member(2), "Ibrahim", CrewRole::Diving),
            ],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.distribution.crew_share, dec("300.00"));
        assert_eq!(result.crew.total_weight_units, dec("1.50"));
        assert_eq!(result.crew.per_unit_value, dec("200.00"));
        assert_eq!(result.crew.member_payouts.len(), 2);
        assert_eq!(result.crew.member_payouts[0].total_amount, dec("100.00"));
        assert_eq!(result.crew.member_payouts[1].total_amount, dec("200.00"));
    }

    #[test]
    fn special_role_scales_by_helper_ratio() {
        let mut special = assignment(member(1), "Ahmed", CrewRole::Special);
        special.helper_ratio = Some(dec("1.5"));

        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            assignments: vec![special, assignment(member(2), "Ibrahim", CrewRole::Special)],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        // 0.5 * 1.5 = 0.75 units; missing ratio defaults to 1.0 -> 0.5
        assert_eq!(result.crew.member_payouts[0].total_weight, dec("0.75"));
        assert_eq!(result.crew.member_payouts[1].total_weight, dec("0.50"));
        assert_eq!(result.crew.total_weight_units, dec("1.25"));
    }

    #[test]
    fn multi_role_member_accumulates_into_one_payout() {
        let id = member(7);
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            assignments: vec![
                assignment(id, "Ahmed", CrewRole::Baiting),
                assignment(member(2), "Ibrahim", CrewRole::Helper),
                assignment(id, "Ahmed", CrewRole::Diving),
            ],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        // Ahmed appears once, in first-appearance order, with both roles
        assert_eq!(result.crew.member_payouts.len(), 2);
        let ahmed = &result.crew.member_payouts[0];
        assert_eq!(ahmed.crew_member_id, id);
        assert_eq!(ahmed.total_weight, dec("1.50"));
        assert_eq!(ahmed.roles.len(), 2);
        // 2.0 units total, crew share 300 -> 150 per unit
        assert_eq!(ahmed.total_amount, dec("225.00"));
        assert_eq!(result.crew.member_payouts[1].total_amount, dec("75.00"));
    }

    #[test]
    fn assignments_without_weightless_revenue_still_guarded() {
        // Revenue but no assignments: crew share exists, nobody to pay
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("500"),
            }],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        assert_eq!(result.distribution.crew_share, dec("300.00"));
        assert_eq!(result.crew.per_unit_value, dec("0.00"));
        assert!(result.crew.member_payouts.is_empty());
    }

    #[test]
    fn uneven_thirds_round_away_from_zero() {
        // 100 sales: net 90, owner 30, crew 60; 250 sales: net 225,
        // owner 75, crew 150. Pick a value forcing repeating thirds.
        let input = TripSettlementInput {
            bills: vec![BillEntry {
                bill_type: BillType::TodaySales,
                amount: dec("100.10"),
            }],
            ..Default::default()
        };

        let result = calculate_trip(&input, Decimal::ZERO);

        // net 90.09, owner 30.03, crew 60.06
        assert_eq!(result.distribution.net_total, dec("90.09"));
        assert_eq!(result.distribution.owner_share, dec("30.03"));
        assert_eq!(result.distribution.crew_share, dec("60.06"));
    }
}
