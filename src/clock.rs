use chrono::{DateTime, Local, NaiveDate};

/// Source of the current time. Injected into anything that needs "now"
/// so tests can pin the clock to a fixed date.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Today's calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a fixed instant
#[cfg(test)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    /// Pin the clock to midnight of the given date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let naive = date.and_hms_opt(0, 0, 0).unwrap();
        Self(naive.and_local_timezone(Local).unwrap())
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
