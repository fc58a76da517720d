//! Clock
//!
//! Source of "today" for the date-range condition.
//!
//! Campaign dates are calendar dates in the *store* time zone (taken from the
//! settings), never the server's local zone.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Supplies the current calendar date in a given time zone.
pub trait Clock {
    /// Today's date in `tz`.
    fn today(&self, tz: &TimeZone) -> Date;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self, tz: &TimeZone) -> Date {
        (**self).today(tz)
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self, tz: &TimeZone) -> Date {
        Timestamp::now().to_zoned(tz.clone()).date()
    }
}

/// A clock frozen on one date, whatever the time zone.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self, _tz: &TimeZone) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz};

    use super::*;

    #[test]
    fn fixed_clock_ignores_time_zone() {
        let clock = FixedClock(date(2024, 1, 15));

        assert_eq!(clock.today(&TimeZone::UTC), date(2024, 1, 15));
        assert_eq!(
            clock.today(&TimeZone::fixed(tz::offset(-10))),
            date(2024, 1, 15)
        );
    }

    #[test]
    fn system_clock_follows_time_zone() {
        let clock = SystemClock;

        // UTC+14 is never behind UTC, UTC-12 is never ahead of it.
        let ahead = clock.today(&TimeZone::fixed(tz::offset(14)));
        let utc = clock.today(&TimeZone::UTC);
        let behind = clock.today(&TimeZone::fixed(tz::offset(-12)));

        assert!(ahead >= utc, "UTC+14 date should not precede the UTC date");
        assert!(behind <= utc, "UTC-12 date should not follow the UTC date");
    }
}
