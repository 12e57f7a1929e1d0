use time::{Date, OffsetDateTime, UtcOffset};

/// Source of the current local calendar date
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Reads the system time and converts it to the local date using an offset
/// captured once at startup.
///
/// `time` refuses to look up the local offset once a process has more than
/// one thread on some platforms, so the lookup happens in `SystemClock::new()`,
/// which `main` calls before anything else.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub(crate) fn new() -> Result<SystemClock, time::error::IndeterminateOffset> {
        UtcOffset::current_local_offset().map(|offset| SystemClock { offset })
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

/// A clock stuck on a single date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// The clock the application runs with: either the system's or one pinned by
/// `--today`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AppClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for AppClock {
    fn today(&self) -> Date {
        match self {
            AppClock::System(c) => c.today(),
            AppClock::Fixed(c) => c.today(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_fixed_clock() {
        let clock = AppClock::Fixed(FixedClock(date!(2024 - 02 - 29)));
        assert_eq!(clock.today(), date!(2024 - 02 - 29));
        assert_eq!((&clock).today(), date!(2024 - 02 - 29));
    }
}
