use chrono::{Datelike, Duration, NaiveDate};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC calendar date
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Money and ratios
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Percentages
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Percent change from `base` to `current`, `None` when the base is zero.
pub fn pct_change(current: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some(round1((current - base) / base * 100.0))
}

/// `part / whole × 100`, `None` when the whole is zero.
pub fn pct_of(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        return None;
    }
    Some(round1(part / whole * 100.0))
}

fn clock_parts(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.trim().split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next().map_or(Some(0), |m| m.parse().ok())?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours, minutes))
}

/// Parse an `"HH:MM"` (or `"HH:MM:SS"`) clock string into decimal hours.
pub fn parse_clock(value: &str) -> Option<f64> {
    clock_parts(value).map(|(h, m)| h as f64 + m as f64 / 60.0)
}

/// Canonical zero-padded `"HH:MM"`, so stored times sort as text.
pub fn normalize_clock(value: &str) -> Option<String> {
    clock_parts(value).map(|(h, m)| format!("{h:02}:{m:02}"))
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .map(|next| (next - month_start(date)).num_days() as u32)
        .unwrap_or(30)
}

/// Same calendar date one year earlier; Feb 29 maps to Feb 28.
pub fn one_year_earlier(date: NaiveDate) -> NaiveDate {
    date.with_year(date.year() - 1)
        .or_else(|| NaiveDate::from_ymd_opt(date.year() - 1, date.month(), 28))
        .unwrap_or(date - Duration::days(365))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(8.0 * 14.0), 112.0);
        assert_eq!(round2(1.005 * 1000.0) / 1000.0, 1.005);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round2(2.675_1), 2.68);
    }

    #[test]
    fn test_pct_change_zero_base_is_none() {
        assert_eq!(pct_change(100.0, 0.0), None);
        assert_eq!(pct_change(110.0, 100.0), Some(10.0));
        assert_eq!(pct_change(0.0, 50.0), Some(-100.0));
    }

    #[test]
    fn test_pct_of() {
        assert_eq!(pct_of(21.0, 100.0), Some(21.0));
        assert_eq!(pct_of(5.0, 0.0), None);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("09:00"), Some(9.0));
        assert_eq!(parse_clock("17:30"), Some(17.5));
        assert_eq!(parse_clock("07:15:00"), Some(7.25));
        assert_eq!(parse_clock("7"), Some(7.0));
        assert_eq!(parse_clock("25:00"), None);
        assert_eq!(parse_clock("ab:cd"), None);
        assert_eq!(parse_clock(""), None);
    }

    #[test]
    fn test_normalize_clock() {
        assert_eq!(normalize_clock("9:00").as_deref(), Some("09:00"));
        assert_eq!(normalize_clock("7").as_deref(), Some("07:00"));
        assert_eq!(normalize_clock(" 17:30:00 ").as_deref(), Some("17:30"));
        assert_eq!(normalize_clock("24:00"), None);
        assert!(normalize_clock("10:00") > normalize_clock("9:00"));
    }

    #[test]
    fn test_week_start() {
        // 2026-02-05 is a Thursday
        assert_eq!(week_start(d("2026-02-05")), d("2026-02-02"));
        assert_eq!(week_start(d("2026-02-02")), d("2026-02-02"));
        assert_eq!(week_start(d("2026-02-08")), d("2026-02-02"));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(d("2026-02-10")), 28);
        assert_eq!(days_in_month(d("2024-02-10")), 29);
        assert_eq!(days_in_month(d("2026-12-31")), 31);
        assert_eq!(days_in_month(d("2026-04-01")), 30);
    }

    #[test]
    fn test_one_year_earlier() {
        assert_eq!(one_year_earlier(d("2026-03-15")), d("2025-03-15"));
        assert_eq!(one_year_earlier(d("2024-02-29")), d("2023-02-28"));
    }

    #[test]
    fn test_snowflake_positive_and_distinct_bits() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1i64 << 53));
    }
}
