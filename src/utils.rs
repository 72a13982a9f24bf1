use crate::error::{AppError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Round to 2 decimals, the precision of every value sent to the frontend.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a provider datetime string.
///
/// Intraday rows carry "YYYY-MM-DD HH:MM:SS", daily and coarser rows just
/// "YYYY-MM-DD" (midnight).
pub fn parse_point_datetime(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
    }
    Err(AppError::DataShape(format!(
        "Invalid datetime value: {}",
        raw
    )))
}

/// Parse a market-state duration, "HH:MM:SS" with an optional "N days "
/// prefix.
pub fn parse_state_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (days, clock) = match raw.split_once(" days ") {
        Some((days, clock)) => {
            let days = days.trim().parse::<i64>().map_err(|_| {
                AppError::DataShape(format!("Invalid duration value: {}", raw))
            })?;
            (days, clock)
        }
        None => (0, raw),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(AppError::DataShape(format!(
            "Invalid duration value: {}",
            raw
        )));
    }

    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part
            .parse::<i64>()
            .map_err(|_| AppError::DataShape(format!("Invalid duration value: {}", raw)))?;
    }
    let [hours, minutes, seconds] = fields;

    Ok(Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(-40.0), -40.0);
        assert_eq!(round2(2.408319), 2.41);
    }

    #[test]
    fn test_parse_point_datetime_intraday_and_daily() {
        let intraday = parse_point_datetime("2023-06-06 09:30:00").unwrap();
        assert_eq!(intraday.format("%H:%M").to_string(), "09:30");

        let daily = parse_point_datetime("2023-06-06").unwrap();
        assert_eq!(daily.format("%H:%M:%S").to_string(), "00:00:00");

        assert!(parse_point_datetime("06/06/2023").is_err());
    }

    #[test]
    fn test_parse_state_duration() {
        assert_eq!(
            parse_state_duration("02:56:09").unwrap(),
            Duration::hours(2) + Duration::minutes(56) + Duration::seconds(9)
        );
        assert_eq!(
            parse_state_duration("0 days 00:00:00").unwrap(),
            Duration::zero()
        );
        assert_eq!(
            parse_state_duration("1 days 01:00:00").unwrap(),
            Duration::days(1) + Duration::hours(1)
        );
        assert!(parse_state_duration("tomorrow").is_err());
    }
}
