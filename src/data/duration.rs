use std::time::Duration;

use thiserror::Error;

/// Errors from [`parse_duration`].
#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("Invalid number in duration: {0}")]
    Number(String),

    #[error("Unknown duration format: {0}")]
    Format(String),
}

/// Suffix to milliseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("s", 1_000.0),
    ("m", 60_000.0),
    ("h", 3_600_000.0),
    ("d", 86_400_000.0),
];

/// Parse duration strings like "90s", "2.5m", "1h", "500ms", "1d"
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .trim()
                .parse()
                .map_err(|_| DurationError::Number(s.to_string()))?;
            if !val.is_finite() || val < 0.0 {
                return Err(DurationError::Number(s.to_string()));
            }
            return Ok(Duration::from_millis((val * multiplier) as u64));
        }
    }

    Err(DurationError::Format(s.to_string()))
}

/// Format a duration for log output
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else if millis < 3_600_000 {
        format!("{:.1}m", d.as_secs_f64() / 60.0)
    } else if millis < 86_400_000 {
        format!("{:.1}h", d.as_secs_f64() / 3_600.0)
    } else {
        format!("{:.1}d", d.as_secs_f64() / 86_400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2.5m").unwrap(), Duration::from_secs(150));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3_600));
    }

    #[test]
    fn test_parse_milliseconds_not_minutes() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_duration(" 1d ").unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_duration("fives"), Err(DurationError::Number(_))));
        assert!(matches!(parse_duration("soon"), Err(DurationError::Format(_))));
        assert!(matches!(parse_duration("10"), Err(DurationError::Format(_))));
        assert!(matches!(parse_duration("-5s"), Err(DurationError::Number(_))));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(20)), "20.0s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1.0h");
    }
}
