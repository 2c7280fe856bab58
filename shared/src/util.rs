use chrono::{Datelike, TimeZone, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC calendar year.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Returns `(year, month0)` for a millisecond timestamp, month0 in `0..12`.
///
/// Out-of-range timestamps yield `None`.
pub fn year_month_of(millis: i64) -> Option<(i32, usize)> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| (dt.year(), dt.month0() as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_of() {
        // 2024-03-15T12:00:00Z
        assert_eq!(year_month_of(1_710_504_000_000), Some((2024, 2)));
        // 1970-01-01
        assert_eq!(year_month_of(0), Some((1970, 0)));
        // 2023-12-31T23:59:59.999Z
        assert_eq!(year_month_of(1_704_067_199_999), Some((2023, 11)));
    }

    #[test]
    fn test_now_is_current_year() {
        let (year, _) = year_month_of(now_millis()).unwrap();
        assert_eq!(year, current_year());
    }
}
