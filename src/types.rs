use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How often a script action may re-fire.
///
/// - `Once`: fires the first time only, never again.
/// - `DelayedReset`: fires, stays quiet for `period`, then re-arms itself.
/// - `UntilDismissed`: fires at most once per `period` until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceMode {
    Once,
    DelayedReset,
    UntilDismissed,
}

impl Default for RecurrenceMode {
    fn default() -> Self {
        RecurrenceMode::Once
    }
}

impl RecurrenceMode {
    /// Whether this mode needs a `period` to be configured.
    pub fn requires_period(self) -> bool {
        !matches!(self, RecurrenceMode::Once)
    }
}

impl fmt::Display for RecurrenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecurrenceMode::Once => "once",
            RecurrenceMode::DelayedReset => "delayed_reset",
            RecurrenceMode::UntilDismissed => "until_dismissed",
        };
        f.write_str(s)
    }
}

impl FromStr for RecurrenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "once" => Ok(RecurrenceMode::Once),
            "delayed_reset" => Ok(RecurrenceMode::DelayedReset),
            "until_dismissed" => Ok(RecurrenceMode::UntilDismissed),
            other => Err(format!(
                "invalid interval: {other} (expected \"once\", \"delayed_reset\" or \"until_dismissed\")"
            )),
        }
    }
}

/// Convert a configured period in whole seconds into a [`Duration`].
///
/// Zero and negative periods collapse to `Duration::ZERO`, which the
/// recurrence policies treat as "no throttling".
pub fn period_from_secs(secs: i64) -> Duration {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}

/// Parse a duration string like `"250ms"`, `"30s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("s").is_err());
    }

    #[test]
    fn oversized_durations_are_errors() {
        let err = parse_duration("5124095576030432h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn negative_periods_collapse_to_zero() {
        assert_eq!(period_from_secs(-5), Duration::ZERO);
        assert_eq!(period_from_secs(0), Duration::ZERO);
        assert_eq!(period_from_secs(60), Duration::from_secs(60));
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("once".parse(), Ok(RecurrenceMode::Once));
        assert_eq!("Delayed-Reset".parse(), Ok(RecurrenceMode::DelayedReset));
        assert_eq!("until_dismissed".parse(), Ok(RecurrenceMode::UntilDismissed));
        assert!("sometimes".parse::<RecurrenceMode>().is_err());
    }
}
