use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current local day so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns today's local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local system calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
