/// Trading-calendar checks in the canonical local zone
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

/// Check if the given instant falls on a trading day (weekends excluded,
/// holidays not checked)
pub fn is_trading_day(now: DateTime<Utc>, zone: Tz) -> bool {
    let local = now.with_timezone(&zone);
    // Monday = 0, Saturday = 5, Sunday = 6
    local.weekday().num_days_from_monday() < 5
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    #[test]
    fn test_weekday_is_trading_day() {
        // 2024-03-01 is a Friday
        let friday = Sao_Paulo.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert!(is_trading_day(friday.with_timezone(&Utc), Sao_Paulo));
    }

    #[test]
    fn test_weekend_is_not_trading_day() {
        // 2024-03-02 is a Saturday, 2024-03-03 a Sunday
        let saturday = Sao_Paulo.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        let sunday = Sao_Paulo.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        assert!(!is_trading_day(saturday.with_timezone(&Utc), Sao_Paulo));
        assert!(!is_trading_day(sunday.with_timezone(&Utc), Sao_Paulo));
    }

    #[test]
    fn test_weekday_resolved_in_local_zone() {
        // Saturday 01:00 UTC is still Friday 22:00 in São Paulo
        let utc = Utc.with_ymd_and_hms(2024, 3, 2, 1, 0, 0).unwrap();
        assert!(is_trading_day(utc, Sao_Paulo));
    }
}
