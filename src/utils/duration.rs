//! Duration parsing for order preparation and delivery budgets

use tracing::warn;

/// Convert a duration string into fractional minutes.
///
/// Accepts `"mm:ss"` (minutes plus seconds / 60) or a plain number of
/// minutes. Anything else, including empty input, yields `0.0`. The result
/// is always finite and never negative.
pub fn parse_minutes(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }

    let parsed = match raw.split_once(':') {
        Some((minutes, seconds)) => parse_clock(minutes, seconds),
        None => raw.parse::<f64>().ok(),
    };

    match parsed {
        Some(minutes) => sanitize_minutes(minutes),
        None => {
            warn!("Unparseable duration {:?}, treating as 0 minutes", raw);
            0.0
        }
    }
}

/// Clamp a numeric minute value to a finite, non-negative number
pub fn sanitize_minutes(minutes: f64) -> f64 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes
    } else {
        0.0
    }
}

fn parse_clock(minutes: &str, seconds: &str) -> Option<f64> {
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    Some(minutes + seconds / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(parse_minutes("12:30"), 12.5);
        assert_eq!(parse_minutes("0:45"), 0.75);
        assert_eq!(parse_minutes(" 5:00 "), 5.0);
    }

    #[test]
    fn parses_plain_minutes() {
        assert_eq!(parse_minutes("20"), 20.0);
        assert_eq!(parse_minutes("7.5"), 7.5);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        assert_eq!(parse_minutes(""), 0.0);
        assert_eq!(parse_minutes("soon"), 0.0);
        assert_eq!(parse_minutes("10:xx"), 0.0);
        assert_eq!(parse_minutes(":"), 0.0);
        assert_eq!(parse_minutes("NaN"), 0.0);
        assert_eq!(parse_minutes("inf"), 0.0);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        assert_eq!(parse_minutes("-4"), 0.0);
        assert_eq!(sanitize_minutes(-1.0), 0.0);
        assert_eq!(sanitize_minutes(f64::NAN), 0.0);
    }
}
