//! Property-based tests over the settlement engine invariants

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    calculate_trip, calculate_week, AssignmentEntry, BillEntry, BillType, CreditEntry, CrewRole,
    ExpenseEntry, ExpenseStatus, TripSettlementInput, WeeklyExpenseEntry, WeeklyExpenseStatus,
    WeeklySettlementInput,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate monetary amounts up to 100,000.00 in whole cents
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn role_strategy() -> impl Strategy<Value = CrewRole> {
    prop_oneof![
        Just(CrewRole::Baiting),
        Just(CrewRole::Fishing),
        Just(CrewRole::Chummer),
        Just(CrewRole::Diving),
        Just(CrewRole::Helper),
        Just(CrewRole::Special),
    ]
}

fn bill_strategy() -> impl Strategy<Value = BillEntry> {
    (
        prop_oneof![
            Just(BillType::TodaySales),
            Just(BillType::PreviousDaySales),
            Just(BillType::Other),
        ],
        amount_strategy(),
    )
        .prop_map(|(bill_type, amount)| BillEntry { bill_type, amount })
}

fn expense_strategy() -> impl Strategy<Value = ExpenseEntry> {
    (
        prop_oneof![
            Just(ExpenseStatus::Pending),
            Just(ExpenseStatus::Approved),
            Just(ExpenseStatus::Rejected),
        ],
        amount_strategy(),
    )
        .prop_map(|(status, amount)| ExpenseEntry { status, amount })
}

/// Generate assignments drawn from a small pool of member IDs so that
/// multi-role members occur often
fn assignment_strategy() -> impl Strategy<Value = AssignmentEntry> {
    (0u128..6, role_strategy(), proptest::option::of(1i64..=20))
        .prop_map(|(member, role, ratio)| AssignmentEntry {
            crew_member_id: Uuid::from_u128(member),
            crew_member_name: format!("Member {}", member),
            role,
            // Ratio within the accepted 0.1 - 2.0 band
            helper_ratio: ratio.map(|r| Decimal::new(r, 1)),
        })
}

fn trip_strategy() -> impl Strategy<Value = TripSettlementInput> {
    (
        proptest::collection::vec(bill_strategy(), 0..5),
        proptest::collection::vec(amount_strategy(), 0..4),
        proptest::collection::vec(expense_strategy(), 0..5),
        proptest::collection::vec(assignment_strategy(), 0..6),
        amount_strategy(),
    )
        .prop_map(
            |(bills, purchase_amounts, expenses, assignments, proper_fish_rate)| {
                TripSettlementInput {
                    bills,
                    purchase_amounts,
                    expenses,
                    assignments,
                    proper_fish_rate,
                }
            },
        )
}

fn weekly_strategy() -> impl Strategy<Value = WeeklySettlementInput> {
    (
        proptest::collection::vec(
            (any::<bool>(), amount_strategy()).prop_map(|(approved, amount)| WeeklyExpenseEntry {
                status: if approved {
                    WeeklyExpenseStatus::Approved
                } else {
                    WeeklyExpenseStatus::Pending
                },
                amount,
            }),
            0..4,
        ),
        proptest::collection::vec(
            (0u128..6, amount_strategy()).prop_map(|(member, amount)| CreditEntry {
                crew_member_id: Uuid::from_u128(member),
                amount,
            }),
            0..5,
        ),
        proptest::collection::vec(trip_strategy(), 0..5),
    )
        .prop_map(|(weekly_expenses, credits, trips)| WeeklySettlementInput {
            weekly_expenses,
            credits,
            trips,
        })
}

// ============================================================================
// Trip invariants
// ============================================================================

proptest! {
    #[test]
    fn owner_and_crew_shares_recompose_net_total(input in trip_strategy()) {
        let result = calculate_trip(&input, Decimal::ZERO);

        // Each third is rounded independently; recomposition drifts by
        // at most one cent per share
        let recomposed = result.distribution.owner_share + result.distribution.crew_share;
        let diff = (recomposed - result.distribution.net_total).abs();
        prop_assert!(diff <= dec("0.02"), "owner+crew {} vs net {}", recomposed, result.distribution.net_total);
    }

    #[test]
    fn net_total_is_ninety_percent_of_balance(input in trip_strategy()) {
        let result = calculate_trip(&input, Decimal::ZERO);

        let expected = result.distribution.balance * dec("0.9");
        let diff = (result.distribution.net_total - expected).abs();
        prop_assert!(diff <= dec("0.02"));
    }

    #[test]
    fn member_payouts_recompose_crew_share(input in trip_strategy()) {
        let result = calculate_trip(&input, Decimal::ZERO);

        if result.crew.member_payouts.is_empty() {
            return Ok(());
        }

        let total: Decimal = result
            .crew
            .member_payouts
            .iter()
            .map(|p| p.total_amount)
            .sum();
        let tolerance = dec("0.01") * Decimal::from(result.crew.member_payouts.len() as i64 + 1);
        let diff = (total - result.distribution.crew_share).abs();
        prop_assert!(diff <= tolerance, "payout sum {} vs crew share {}", total, result.distribution.crew_share);
    }

    #[test]
    fn member_payouts_group_each_member_once(input in trip_strategy()) {
        let result = calculate_trip(&input, Decimal::ZERO);

        let mut seen = std::collections::HashSet::new();
        for payout in &result.crew.member_payouts {
            prop_assert!(seen.insert(payout.crew_member_id));
        }
    }
}

// ============================================================================
// Weekly invariants
// ============================================================================

proptest! {
    #[test]
    fn final_amounts_never_negative(input in weekly_strategy()) {
        let result = calculate_week(&input);

        for payout in &result.payouts {
            prop_assert!(payout.final_amount >= Decimal::ZERO);
            prop_assert!(payout.final_amount <= payout.base_amount.max(Decimal::ZERO) + dec("0.01"));
        }
    }

    #[test]
    fn payouts_always_sorted_by_name(input in weekly_strategy()) {
        let result = calculate_week(&input);

        for pair in result.payouts.windows(2) {
            prop_assert!(pair[0].crew_member_name <= pair[1].crew_member_name);
        }
    }

    #[test]
    fn fishing_days_match_trip_count(input in weekly_strategy()) {
        let trips = input.trips.len() as u32;
        let result = calculate_week(&input);

        prop_assert_eq!(result.summary.fishing_days, trips);
        for payout in &result.payouts {
            prop_assert!(payout.trips_count >= 1);
            prop_assert!(payout.trips_count <= trips);
        }
    }

    #[test]
    fn weekly_share_totals_the_approved_expenses(input in weekly_strategy()) {
        let approved: Decimal = input
            .weekly_expenses
            .iter()
            .filter(|e| e.status == WeeklyExpenseStatus::Approved)
            .map(|e| e.amount)
            .sum();
        let trips = input.trips.len();

        let result = calculate_week(&input);

        if trips == 0 {
            prop_assert_eq!(result.expenses.weekly_share, Decimal::ZERO);
        } else {
            // Per-trip shares are rounded before summing
            let tolerance = dec("0.01") * Decimal::from(trips as i64);
            let diff = (result.expenses.weekly_share - approved).abs();
            prop_assert!(diff <= tolerance, "weekly share {} vs approved {}", result.expenses.weekly_share, approved);
        }
    }
}
