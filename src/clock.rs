//! Source of "now" and of the calendar used to decide what "today" is.
//!
//! A [`Calendar`] maps an instant to its local date using the timezone rules
//! in force at that instant, so a watering recorded before a DST change is
//! dated with the offset it happened under, not today's.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Utc};

pub trait Calendar {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate;
}

impl Calendar for Local {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(self).date_naive()
    }
}

impl Calendar for Utc {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.date_naive()
    }
}

impl Calendar for FixedOffset {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(self).date_naive()
    }
}

pub trait Clock: Calendar + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock with the process's local timezone rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Calendar for SystemClock {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        Local.date_of(at)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock on a fixed-offset calendar. Clones share the
/// same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move to `now`, taking its offset as the new calendar.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }

    fn current(&self) -> DateTime<FixedOffset> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

impl Calendar for FixedClock {
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.current().offset().date_of(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current().with_timezone(&Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_dates_in_its_offset() {
        let clock = FixedClock::new(DateTime::parse_from_rfc3339("2026-01-05T01:00:00+03:00").unwrap());
        let now = clock.now();

        assert_eq!(now, "2026-01-04T22:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(clock.date_of(now), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(Utc.date_of(now), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }
}
