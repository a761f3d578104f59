//! Tests for dated fish rate resolution

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{effective_rate, proper_fish_fallback_rate, FishTypeRate};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn rate(
    per_kilo: &str,
    from: Option<&str>,
    to: Option<&str>,
    is_active: bool,
) -> FishTypeRate {
    FishTypeRate {
        id: Uuid::new_v4(),
        fish_type_id: Uuid::new_v4(),
        rate_per_kilo: dec(per_kilo),
        rate_effective_from: from.map(date),
        rate_effective_to: to.map(date),
        is_active,
        created_at: Utc::now(),
    }
}

mod rate_resolution {
    use super::*;

    #[test]
    fn rate_within_window_applies() {
        let rates = vec![rate("18", Some("2025-01-01"), Some("2025-01-31"), true)];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-01-15")),
            dec("18")
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let rates = vec![rate("18", Some("2025-01-01"), Some("2025-01-31"), true)];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-01-01")),
            dec("18")
        );
        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-01-31")),
            dec("18")
        );
    }

    #[test]
    fn date_outside_window_falls_back_to_default() {
        let rates = vec![rate("18", Some("2025-01-01"), Some("2025-01-31"), true)];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-02-01")),
            dec("16")
        );
    }

    #[test]
    fn open_ended_windows_are_unbounded() {
        let no_end = vec![rate("20", Some("2025-01-01"), None, true)];
        assert_eq!(
            effective_rate(dec("16"), &no_end, date("2030-12-31")),
            dec("20")
        );

        let no_start = vec![rate("14", None, Some("2025-01-31"), true)];
        assert_eq!(
            effective_rate(dec("16"), &no_start, date("2020-06-01")),
            dec("14")
        );
    }

    #[test]
    fn latest_effective_from_wins_among_overlaps() {
        let rates = vec![
            rate("18", Some("2025-01-01"), None, true),
            rate("22", Some("2025-01-10"), None, true),
            rate("20", Some("2025-01-05"), None, true),
        ];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-01-20")),
            dec("22")
        );
    }

    #[test]
    fn undated_rate_loses_to_any_dated_rate() {
        let rates = vec![
            rate("12", None, None, true),
            rate("18", Some("2025-01-01"), None, true),
        ];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-06-01")),
            dec("18")
        );
    }

    #[test]
    fn inactive_rates_are_skipped() {
        let rates = vec![rate("99", Some("2025-01-01"), None, false)];

        assert_eq!(
            effective_rate(dec("16"), &rates, date("2025-01-15")),
            dec("16")
        );
    }

    #[test]
    fn no_rates_uses_default() {
        assert_eq!(effective_rate(dec("16.50"), &[], date("2025-01-15")), dec("16.50"));
    }
}

mod proper_fish_fallback {
    use super::*;

    #[test]
    fn unconfigured_proper_fish_rate_is_sixteen() {
        assert_eq!(proper_fish_fallback_rate(), dec("16.00"));
    }
}
