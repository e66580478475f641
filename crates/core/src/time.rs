use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// A simple clock abstraction for deterministic time in services and tests.
///
/// Quiz timestamps are wall-clock local time, so the clock hands out naive
/// local date-times rather than UTC instants.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current local time according to the clock.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::Default => Local::now().naive_local(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Current time truncated to whole minutes, the resolution of history records.
    #[must_use]
    pub fn now_to_minute(&self) -> NaiveDateTime {
        truncate_to_minute(self.now())
    }

}

/// Drops seconds and sub-second precision.
#[must_use]
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Returns a deterministic timestamp for tests and doc examples (2023-11-14 22:13:20).
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 11, 14)
        .and_then(|d| d.and_hms_opt(22, 13, 20))
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_the_minute() {
        let at = fixed_now();
        let truncated = truncate_to_minute(at);
        assert_eq!(truncated.minute(), 13);
        assert_eq!(truncated.second(), 0);
    }

    #[test]
    fn fixed_clock_reports_minute_resolution() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), fixed_now());
        assert_eq!(clock.now_to_minute().second(), 0);
        assert_eq!(clock.now_to_minute().minute(), 13);
    }
}
