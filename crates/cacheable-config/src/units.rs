//! Time units accepted in cache-name TTL policies.

use cacheable_core::{CacheableError, CacheableResult};
use std::fmt;
use std::time::Duration;

/// Closed set of units a cache TTL may be expressed in.
///
/// Configuration spells them in upper case (`SECONDS`, `MINUTES`, `HOURS`,
/// `DAYS`); matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// All supported units.
    pub const ALL: [Self; 4] = [Self::Seconds, Self::Minutes, Self::Hours, Self::Days];

    /// Parses a unit name, returning `None` for anything outside the set.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Parses the unit configured for `cache_name`.
    pub fn for_cache(cache_name: &str, name: &str) -> CacheableResult<Self> {
        Self::parse(name).ok_or_else(|| CacheableError::UnknownTimeUnit {
            cache_name: cache_name.to_string(),
            unit: name.to_string(),
        })
    }

    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }

    /// Number of seconds in one unit.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3_600,
            Self::Days => 86_400,
        }
    }

    /// Converts `amount` of this unit to a `Duration`, saturating on overflow.
    #[must_use]
    pub const fn to_duration(self, amount: u64) -> Duration {
        Duration::from_secs(amount.saturating_mul(self.seconds()))
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_units() {
        assert_eq!(TimeUnit::parse("SECONDS"), Some(TimeUnit::Seconds));
        assert_eq!(TimeUnit::parse("minutes"), Some(TimeUnit::Minutes));
        assert_eq!(TimeUnit::parse(" Hours "), Some(TimeUnit::Hours));
        assert_eq!(TimeUnit::parse("DAYS"), Some(TimeUnit::Days));
    }

    #[test]
    fn test_parse_unknown_unit() {
        assert_eq!(TimeUnit::parse("FORTNIGHTS"), None);
        assert_eq!(TimeUnit::parse(""), None);
        assert_eq!(TimeUnit::parse("MILLIS"), None);
    }

    #[test]
    fn test_for_cache_names_offender() {
        let err = TimeUnit::for_cache("sales-customers", "WEEKZ").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sales-customers"));
        assert!(message.contains("WEEKZ"));
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(TimeUnit::Seconds.to_duration(60), Duration::from_secs(60));
        assert_eq!(TimeUnit::Minutes.to_duration(5), Duration::from_secs(300));
        assert_eq!(TimeUnit::Hours.to_duration(2), Duration::from_secs(7_200));
        assert_eq!(TimeUnit::Days.to_duration(1), Duration::from_secs(86_400));
        assert_eq!(TimeUnit::Days.to_duration(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
