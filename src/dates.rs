//! Calendar helpers for building history request windows.

use chrono::{Days, NaiveDate};

/// First day of an inclusive `days`-long window ending on `today`.
///
/// A window of 0 or 1 days starts today.
pub fn start_date_n_days_ago(today: NaiveDate, days: u32) -> NaiveDate {
    // ---
    let back = u64::from(days.saturating_sub(1));
    today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// `(start, end)` of the history window, both inclusive; `end` is today.
pub fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (start_date_n_days_ago(today, days), today)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_inclusive_of_today() {
        // ---
        assert_eq!(start_date_n_days_ago(date(2025, 6, 7), 7), date(2025, 6, 1));
        assert_eq!(start_date_n_days_ago(date(2025, 6, 7), 1), date(2025, 6, 7));
        assert_eq!(start_date_n_days_ago(date(2025, 6, 7), 0), date(2025, 6, 7));
    }

    #[test]
    fn test_window_crosses_month_and_year() {
        // ---
        assert_eq!(start_date_n_days_ago(date(2025, 3, 2), 3), date(2025, 2, 28));
        assert_eq!(
            history_window(date(2025, 1, 2), 7),
            (date(2024, 12, 27), date(2025, 1, 2))
        );
    }
}
